//! View-model - the single owned state of the query screen
//!
//! All mutation happens on the event-loop thread. API results arrive as
//! `Result` values and are applied through `apply_features` and
//! `apply_results`, one call site per request kind.

use super::form::{FormState, QueryForm, QueryPattern, QUERY_PATTERNS};
use super::result::{derive_fields, ResultRow};
use super::table::{PageSize, ResultsTableState};
use crate::error::ApiError;

/// State of the form, the results table and the error dialog
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub form: FormState,
    pub patterns: &'static [QueryPattern],
    pub table: ResultsTableState,
    /// Rows of the last successful query
    pub results: Vec<ResultRow>,
    /// Column list, derived from the first result row
    pub fields: Vec<String>,
    /// Whether the form panel is shown
    pub form_visible: bool,
    /// Whether the generic error dialog is shown
    pub error_dialog_open: bool,
    /// Number of submitted queries without a response yet
    in_flight: usize,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ViewModel {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            form: FormState::new(),
            patterns: QUERY_PATTERNS,
            table: ResultsTableState::new(page_size),
            results: Vec::new(),
            fields: Vec::new(),
            form_visible: true,
            error_dialog_open: false,
            in_flight: 0,
        }
    }

    pub fn show_error(&mut self) {
        self.error_dialog_open = true;
    }

    pub fn hide_error(&mut self) {
        self.error_dialog_open = false;
    }

    pub fn toggle_form(&mut self) {
        self.form_visible = !self.form_visible;
    }

    /// Apply the outcome of a feature fetch
    pub fn apply_features(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(names) => {
                let added = self.form.append_features(names);
                tracing::debug!(added, total = self.form.features.len(), "features loaded");
            }
            Err(err) => {
                tracing::warn!(error = %err, "feature fetch failed");
                self.show_error();
            }
        }
    }

    /// Mark a query as started and return the payload to send
    pub fn begin_submit(&mut self) -> QueryForm {
        self.in_flight += 1;
        self.table.busy = true;
        self.form.payload()
    }

    /// Apply the outcome of a submitted query
    pub fn apply_results(&mut self, result: Result<Vec<ResultRow>, ApiError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.table.busy = self.in_flight > 0;

        match result {
            Ok(rows) => {
                self.fields = derive_fields(&rows);
                self.results = rows;
                self.table
                    .reset_for_results(self.results.len(), self.fields.len());
                tracing::debug!(
                    rows = self.results.len(),
                    columns = self.fields.len(),
                    "results applied"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "query failed");
                self.show_error();
            }
        }
    }

    /// Rows in display order (sorted, all pages)
    pub fn rows_in_display_order(&self) -> Vec<&ResultRow> {
        self.table
            .sorted_indices(&self.results)
            .into_iter()
            .map(|i| &self.results[i])
            .collect()
    }

    /// Rows shown on the current page
    pub fn page_rows(&self) -> Vec<&ResultRow> {
        self.table
            .page_indices(&self.results)
            .into_iter()
            .map(|i| &self.results[i])
            .collect()
    }

    pub fn selected_field(&self) -> Option<&str> {
        self.fields
            .get(self.table.selected_column)
            .map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result::CellValue;

    fn rows(json: &str) -> Vec<ResultRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let vm = ViewModel::default();
        assert!(vm.form_visible);
        assert!(vm.results.is_empty());
        assert!(vm.fields.is_empty());
        assert!(!vm.table.busy);
        assert!(!vm.error_dialog_open);
        assert_eq!(vm.form.selected_pattern, None);
        assert_eq!(vm.table.sort, None);
    }

    #[test]
    fn test_features_become_options() {
        let mut vm = ViewModel::default();
        vm.apply_features(Ok(vec!["a".into(), "b".into(), "c".into()]));
        assert_eq!(vm.form.features.len(), 3);
        assert!(vm.form.features.iter().all(|f| f.label == f.value));
        assert!(!vm.error_dialog_open);
    }

    #[test]
    fn test_feature_failure_opens_dialog_and_keeps_state() {
        let mut vm = ViewModel::default();
        vm.apply_features(Ok(vec!["a".into()]));
        vm.apply_features(Err(ApiError::Transport("refused".into())));
        assert!(vm.error_dialog_open);
        assert_eq!(vm.form.features.len(), 1);
    }

    #[test]
    fn test_results_replace_rows_and_reset_sort() {
        let mut vm = ViewModel::default();
        vm.table.cycle_sort("x");

        vm.begin_submit();
        assert!(vm.table.busy);

        vm.apply_results(Ok(rows(
            r#"[{"hash": "a", "clauses": 3}, {"hash": "b", "clauses": 1}]"#,
        )));
        assert!(!vm.table.busy);
        assert_eq!(vm.table.row_count, 2);
        assert_eq!(vm.fields, vec!["hash", "clauses"]);
        assert_eq!(vm.table.sort, None);
    }

    #[test]
    fn test_submit_scenario() {
        let mut vm = ViewModel::default();
        vm.apply_features(Ok(vec!["variables".into(), "clauses".into()]));
        vm.form.toggle_feature("variables");
        vm.form.query = "variables > 5000000".to_string();

        let payload = vm.begin_submit();
        assert_eq!(payload.query, "variables > 5000000");
        assert_eq!(payload.selected_features, vec!["variables"]);

        vm.apply_results(Ok(rows(r#"[{"variables": 6000000, "clauses": 10}]"#)));
        assert_eq!(vm.table.row_count, 1);
        assert_eq!(vm.fields, vec!["variables", "clauses"]);
        assert_eq!(vm.table.sort, None);
        assert_eq!(vm.results[0]["variables"], CellValue::Integer(6000000));
    }

    #[test]
    fn test_empty_results_give_empty_columns() {
        let mut vm = ViewModel::default();
        vm.begin_submit();
        vm.apply_results(Ok(rows(r#"[{"a": 1}]"#)));
        vm.begin_submit();
        vm.apply_results(Ok(Vec::new()));
        assert!(vm.fields.is_empty());
        assert_eq!(vm.table.row_count, 0);
        assert!(vm.page_rows().is_empty());
    }

    #[test]
    fn test_query_failure_keeps_table() {
        let mut vm = ViewModel::default();
        vm.apply_features(Ok(vec!["a".into()]));
        vm.begin_submit();
        vm.apply_results(Ok(rows(r#"[{"a": 1}]"#)));

        vm.begin_submit();
        vm.apply_results(Err(ApiError::Status(500)));

        assert!(vm.error_dialog_open);
        assert!(!vm.table.busy);
        assert_eq!(vm.table.row_count, 1);
        assert_eq!(vm.fields, vec!["a"]);
        assert_eq!(vm.form.features.len(), 1);

        vm.hide_error();
        assert!(!vm.error_dialog_open);
    }

    #[test]
    fn test_busy_until_all_in_flight_queries_answer() {
        let mut vm = ViewModel::default();
        vm.begin_submit();
        vm.begin_submit();
        vm.apply_results(Ok(Vec::new()));
        assert!(vm.table.busy);
        vm.apply_results(Err(ApiError::Malformed("x".into())));
        assert!(!vm.table.busy);
    }

    #[test]
    fn test_display_order_follows_sort() {
        let mut vm = ViewModel::default();
        vm.begin_submit();
        vm.apply_results(Ok(rows(r#"[{"n": 2}, {"n": 1}, {"n": 3}]"#)));
        vm.table.cycle_sort("n");
        let order: Vec<_> = vm
            .rows_in_display_order()
            .iter()
            .map(|r| r["n"].to_string())
            .collect();
        assert_eq!(order, vec!["1", "2", "3"]);
        assert_eq!(vm.selected_field(), Some("n"));
    }
}
