//! App - Root component
//!
//! Owns the view-model and the background request runners, routes key
//! events to the focused component or the top modal, and applies Actions.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, ErrorDialog, FeatureSelectorDialog, HelpDialog, HistoryDialog,
    PatternPickerDialog, QueryFormComponent, QuitDialog, ResultsTableComponent,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::Focus;
use crate::model::{QueryForm, QueryHistory, QueryOutcome, ResultRow, ViewModel};
use crate::services::{export_results, GbdApi, JobRunner, Origin};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Form, results and table state
    pub view_model: ViewModel,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Panel receiving keys when no modal is open
    pub focus: Focus,

    /// Queries submitted this session
    pub history: QueryHistory,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Directory CSV exports are written to
    pub export_dir: PathBuf,

    pub config: Config,

    /// Server origin shown in the help bar
    server_label: String,

    api: Arc<dyn GbdApi>,
    feature_jobs: JobRunner<Vec<String>>,
    query_jobs: JobRunner<Vec<ResultRow>>,

    /// Payloads of running queries by job label, for the history
    pending_queries: HashMap<String, QueryForm>,
    next_query_id: u64,

    /// Set once the initial feature list request has gone out
    features_requested: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub query_form: QueryFormComponent,
    pub results_table: ResultsTableComponent,
    pub feature_selector: FeatureSelectorDialog,
    pub pattern_picker: PatternPickerDialog,
    pub history_dialog: HistoryDialog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
    pub error_dialog: ErrorDialog,
}

impl App {
    pub fn new(api: Arc<dyn GbdApi>, config: Config) -> App {
        let server_label = Origin::parse(&config.server)
            .map(|origin| origin.to_string())
            .unwrap_or_else(|_| config.server.clone());
        let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        App {
            view_model: ViewModel::new(config.page_size()),
            modals: ModalStack::new(),
            focus: Focus::Form,
            history: QueryHistory::new(),
            should_quit: false,
            status_message: None,
            export_dir,
            config,
            server_label,
            api,
            feature_jobs: JobRunner::new(),
            query_jobs: JobRunner::new(),
            pending_queries: HashMap::new(),
            next_query_id: 0,
            features_requested: false,
            query_form: QueryFormComponent { focused: true },
            results_table: ResultsTableComponent::default(),
            feature_selector: FeatureSelectorDialog::default(),
            pattern_picker: PatternPickerDialog::default(),
            history_dialog: HistoryDialog::default(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
            error_dialog: ErrorDialog,
        }
    }

    /// Whether any request is still waiting for a response
    pub fn has_pending_requests(&self) -> bool {
        self.feature_jobs.in_flight() > 0 || self.query_jobs.in_flight() > 0
    }

    /// Called after every frame; the first one requests the feature list
    /// so the form is on screen before any network work starts.
    pub fn on_frame_drawn(&mut self) -> Result<()> {
        if !self.features_requested {
            self.features_requested = true;
            let mut action = Some(Action::FetchFeatures);
            while let Some(a) = action {
                action = self.update(a)?;
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // The error dialog is modal over everything, including other modals
        if self.view_model.error_dialog_open {
            return self.error_dialog.handle_key_event(key);
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        match self.focus {
            Focus::Form if self.view_model.form_visible => self.query_form.handle_key_event(key),
            _ => self.results_table.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.poll_jobs(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // API Requests
            // ─────────────────────────────────────────────────────────────────
            Action::FetchFeatures => self.fetch_features(),
            Action::SubmitQuery => self.submit_query(),

            // ─────────────────────────────────────────────────────────────────
            // Form
            // ─────────────────────────────────────────────────────────────────
            Action::FocusForm => {
                self.focus = Focus::Form;
                self.view_model.form_visible = true;
                self.query_form.update(Action::FocusForm)?;
                self.results_table.update(Action::FocusForm)?;
            }
            Action::FocusTable => {
                self.focus = Focus::Table;
                self.query_form.update(Action::FocusTable)?;
                self.results_table.update(Action::FocusTable)?;
            }
            Action::ToggleForm => {
                self.view_model.toggle_form();
                if !self.view_model.form_visible && self.focus == Focus::Form {
                    return Ok(Some(Action::FocusTable));
                }
            }
            Action::QueryInput(c) => self.view_model.form.push_char(c),
            Action::QueryBackspace => self.view_model.form.pop_char(),
            Action::ClearQuery => self.view_model.form.clear_query(),

            // ─────────────────────────────────────────────────────────────────
            // Table
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow => self.view_model.table.next_row(),
            Action::PrevRow => self.view_model.table.prev_row(),
            Action::NextColumn => {
                let count = self.view_model.fields.len();
                self.view_model.table.next_column(count);
            }
            Action::PrevColumn => self.view_model.table.prev_column(),
            Action::CycleSort => {
                if let Some(field) = self.view_model.selected_field().map(str::to_string) {
                    self.view_model.table.cycle_sort(&field);
                    tracing::debug!(column = %field, sort = ?self.view_model.table.sort, "sort changed");
                }
            }
            Action::NextPage => self.view_model.table.next_page(),
            Action::PrevPage => self.view_model.table.prev_page(),
            Action::FirstPage => self.view_model.table.first_page(),
            Action::LastPage => self.view_model.table.last_page(),
            Action::CyclePageSize => {
                self.view_model.table.cycle_page_size();
                self.status_message = Some(format!(
                    "{} rows per page",
                    self.view_model.table.page_size.rows()
                ));
            }
            Action::ExportCsv => self.export_csv(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.query_running = self.query_jobs.in_flight() > 0;
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenFeatureSelector => {
                self.modals.push(Modal::FeatureSelector { selected_index: 0 });
            }
            Action::ToggleFeature(name) => self.view_model.form.toggle_feature(&name),
            Action::OpenPatternPicker => {
                let selected_index = self.view_model.form.selected_pattern.unwrap_or(0);
                self.modals.push(Modal::PatternPicker { selected_index });
            }
            Action::ApplyPattern(index) => {
                if self.view_model.form.apply_pattern(index) {
                    return Ok(Some(Action::FocusForm));
                }
            }
            Action::OpenHistory => {
                if matches!(self.modals.top(), Some(Modal::History { .. })) {
                    self.modals.pop();
                } else {
                    self.modals.push(Modal::History { selected_index: 0 });
                }
            }
            Action::RestoreQuery(index) => {
                if let Some(entry) = self.history.get(index) {
                    let form = &mut self.view_model.form;
                    form.query = entry.form.query.clone();
                    form.selected_features = entry.form.selected_features.clone();
                    form.selected_pattern = None;
                    self.status_message = Some(format!("Restored query from {}", entry.formatted_time()));
                    return Ok(Some(Action::FocusForm));
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => return Ok(self.confirm_modal()),
            Action::ModalUp => self.move_modal_cursor(false),
            Action::ModalDown => self.move_modal_cursor(true),
            Action::DismissError => self.view_model.hide_error(),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(
            area,
            self.view_model.form_visible,
            self.status_message.is_some(),
        );

        if let Some(form_area) = layout.form {
            self.query_form.draw_with_form(
                frame,
                form_area,
                &self.view_model.form,
                self.view_model.table.busy,
            )?;
        }
        self.results_table
            .draw_with_view_model(frame, layout.table, &mut self.view_model)?;

        if let (Some(status_area), Some(status)) = (layout.status, self.status_message.as_deref()) {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                format!(" {} ", status),
                Style::default().fg(Color::Yellow),
            )));
            frame.render_widget(paragraph, status_area);
        }
        self.render_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }

        // Drawn last so it covers any open modal
        if self.view_model.error_dialog_open {
            self.error_dialog.draw(frame, area)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn fetch_features(&mut self) {
        let api = Arc::clone(&self.api);
        self.feature_jobs
            .spawn("features", move || api.fetch_features());
        self.status_message = Some("Fetching features...".to_string());
    }

    fn submit_query(&mut self) {
        let form = self.view_model.begin_submit();
        self.next_query_id += 1;
        let label = format!("query-{}", self.next_query_id);
        tracing::info!(
            job = %label,
            query = %form.query,
            features = form.selected_features.len(),
            "submitting query"
        );

        self.pending_queries.insert(label.clone(), form.clone());
        let api = Arc::clone(&self.api);
        self.query_jobs
            .spawn(label, move || api.submit_query(&form));
        self.status_message = Some("Running query...".to_string());
    }

    /// Apply finished requests to the view-model
    fn poll_jobs(&mut self) {
        for outcome in self.feature_jobs.poll() {
            tracing::debug!(
                job = %outcome.label,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "feature fetch finished"
            );
            let before = self.view_model.form.features.len();
            let ok = outcome.result.is_ok();
            self.view_model.apply_features(outcome.result);
            self.status_message = if ok {
                Some(format!(
                    "{} features available ({} new)",
                    self.view_model.form.features.len(),
                    self.view_model.form.features.len() - before
                ))
            } else {
                None
            };
        }

        for outcome in self.query_jobs.poll() {
            let form = self
                .pending_queries
                .remove(&outcome.label)
                .unwrap_or_default();
            let query_outcome = match &outcome.result {
                Ok(rows) => QueryOutcome::Rows(rows.len()),
                Err(_) => QueryOutcome::Failed,
            };
            let had_entries = !self.history.is_empty();
            self.history
                .record(form, query_outcome, outcome.elapsed.as_secs_f64());
            // keep an open history list on the entry it was showing
            if let Some(Modal::History { selected_index }) = self.modals.top_mut() {
                if had_entries {
                    *selected_index = (*selected_index + 1).min(self.history.len() - 1);
                }
            }
            self.view_model.apply_results(outcome.result);

            self.status_message = match (query_outcome, self.history.get(0)) {
                (QueryOutcome::Rows(n), Some(entry)) => {
                    Some(format!("{} rows in {}", n, entry.formatted_duration()))
                }
                _ => None,
            };
        }
    }

    fn export_csv(&mut self) {
        if self.view_model.results.is_empty() {
            self.status_message = Some("Nothing to export".to_string());
            return;
        }

        let rows = self.view_model.rows_in_display_order();
        let delimiter = self.config.delimiter_byte();
        self.status_message = match export_results(
            &self.export_dir,
            &self.view_model.fields,
            &rows,
            delimiter,
        ) {
            Ok(path) => Some(format!("Exported {} rows to {}", rows.len(), path.display())),
            Err(err) => {
                tracing::error!(error = %err, "export failed");
                Some(format!("Export failed: {}", err))
            }
        };
    }

    /// Resolve the Enter key of the top modal into a follow-up action
    fn confirm_modal(&mut self) -> Option<Action> {
        match self.modals.top().cloned()? {
            Modal::QuitConfirm => {
                self.should_quit = true;
                None
            }
            Modal::FeatureSelector { selected_index } => self
                .view_model
                .form
                .features
                .get(selected_index)
                .map(|option| Action::ToggleFeature(option.value.clone())),
            Modal::PatternPicker { selected_index } => {
                self.modals.pop();
                Some(Action::ApplyPattern(selected_index))
            }
            Modal::History { selected_index } => {
                self.modals.pop();
                Some(Action::RestoreQuery(selected_index))
            }
            Modal::Help => {
                self.modals.pop();
                None
            }
        }
    }

    fn move_modal_cursor(&mut self, down: bool) {
        let len = match self.modals.top() {
            Some(Modal::FeatureSelector { .. }) => self.view_model.form.features.len(),
            Some(Modal::PatternPicker { .. }) => self.view_model.patterns.len(),
            Some(Modal::History { .. }) => self.history.len(),
            _ => return,
        };
        if let Some(
            Modal::FeatureSelector { selected_index }
            | Modal::PatternPicker { selected_index }
            | Modal::History { selected_index },
        ) = self.modals.top_mut()
        {
            if down {
                if *selected_index + 1 < len {
                    *selected_index += 1;
                }
            } else {
                *selected_index = selected_index.saturating_sub(1);
            }
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::FeatureSelector { .. } => self.feature_selector.handle_key_event(key),
            Modal::PatternPicker { .. } => self.pattern_picker.handle_key_event(key),
            Modal::History { .. } => self.history_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::FeatureSelector { selected_index } => {
                self.feature_selector.selected_index = *selected_index;
                self.feature_selector
                    .draw_with_form(frame, area, &self.view_model.form)?;
            }
            Modal::PatternPicker { selected_index } => {
                self.pattern_picker.selected_index = *selected_index;
                self.pattern_picker.draw_with_patterns(
                    frame,
                    area,
                    self.view_model.patterns,
                    self.view_model.form.selected_pattern,
                )?;
            }
            Modal::History { selected_index } => {
                self.history_dialog.selected_index = *selected_index;
                self.history_dialog.draw_with_history(
                    frame,
                    area,
                    self.history.entries(),
                    &self.view_model.form.features,
                )?;
            }
            Modal::Help => self.help_dialog.draw(frame, area)?,
        }
        Ok(())
    }

    fn render_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key_style = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

        let mut spans = match self.focus {
            Focus::Form if self.view_model.form_visible => vec![
                Span::styled(" Enter ", key_style(Color::Green)),
                Span::raw("Submit  "),
                Span::styled(" Esc ", key_style(Color::Yellow)),
                Span::raw("Table  "),
                Span::styled(" ^F ", key_style(Color::Cyan)),
                Span::raw("Features  "),
                Span::styled(" ^P ", key_style(Color::Cyan)),
                Span::raw("Patterns  "),
                Span::styled(" ^U ", key_style(Color::Cyan)),
                Span::raw("Clear"),
            ],
            _ => vec![
                Span::styled(" / ", key_style(Color::Green)),
                Span::raw("Query  "),
                Span::styled(" s ", key_style(Color::Cyan)),
                Span::raw("Sort  "),
                Span::styled(" [ ] ", key_style(Color::Cyan)),
                Span::raw("Page  "),
                Span::styled(" z ", key_style(Color::Cyan)),
                Span::raw("Page size  "),
                Span::styled(" x ", key_style(Color::Magenta)),
                Span::raw("Export  "),
                Span::styled(" ? ", key_style(Color::Yellow)),
                Span::raw("Help  "),
                Span::styled(" q ", key_style(Color::Red)),
                Span::raw("Quit"),
            ],
        };
        spans.push(Span::styled(
            format!("  {}", self.server_label),
            Style::default().fg(Color::DarkGray),
        ));

        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(paragraph, area);
    }
}
