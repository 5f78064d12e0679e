//! Session query history
//!
//! Kept in memory for the lifetime of the process only.

use super::form::QueryForm;
use chrono::{DateTime, Local};

/// Maximum number of entries kept
const MAX_ENTRIES: usize = 100;

/// How a submitted query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(usize),
    Failed,
}

/// A single submitted query
#[derive(Debug, Clone)]
pub struct QueryHistoryEntry {
    pub timestamp: DateTime<Local>,
    pub form: QueryForm,
    pub outcome: QueryOutcome,
    pub duration_secs: f64,
}

impl QueryHistoryEntry {
    pub fn status_icon(&self) -> &str {
        match self.outcome {
            QueryOutcome::Rows(_) => "✓",
            QueryOutcome::Failed => "✗",
        }
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }

    pub fn formatted_duration(&self) -> String {
        if self.duration_secs < 1.0 {
            format!("{:.0}ms", self.duration_secs * 1000.0)
        } else {
            format!("{:.1}s", self.duration_secs)
        }
    }

    pub fn summary(&self) -> String {
        match self.outcome {
            QueryOutcome::Rows(n) => format!("{} rows", n),
            QueryOutcome::Failed => "failed".to_string(),
        }
    }
}

/// Newest-first list of submitted queries
#[derive(Debug, Clone, Default)]
pub struct QueryHistory {
    entries: Vec<QueryHistoryEntry>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, form: QueryForm, outcome: QueryOutcome, duration_secs: f64) {
        self.entries.insert(
            0,
            QueryHistoryEntry {
                timestamp: Local::now(),
                form,
                outcome,
                duration_secs,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[QueryHistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&QueryHistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(query: &str) -> QueryForm {
        QueryForm {
            query: query.to_string(),
            selected_features: vec![],
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = QueryHistory::new();
        history.record(form("a"), QueryOutcome::Rows(1), 0.1);
        history.record(form("b"), QueryOutcome::Failed, 0.2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).map(|e| e.form.query.as_str()), Some("b"));
        assert_eq!(history.get(0).map(|e| e.status_icon()), Some("✗"));
    }

    #[test]
    fn test_capped() {
        let mut history = QueryHistory::new();
        for i in 0..(MAX_ENTRIES + 5) {
            history.record(form(&i.to_string()), QueryOutcome::Rows(i), 0.0);
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(
            history.get(0).map(|e| e.form.query.clone()),
            Some((MAX_ENTRIES + 4).to_string())
        );
    }

    #[test]
    fn test_formatting() {
        let mut history = QueryHistory::new();
        history.record(form("a"), QueryOutcome::Rows(3), 1.5);
        let entry = &history.entries()[0];
        assert_eq!(entry.formatted_duration(), "1.5s");
        assert_eq!(entry.summary(), "3 rows");
    }
}
