//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod error_dialog;
pub mod feature_selector;
pub mod help_dialog;
pub mod history_dialog;
pub mod layout;
pub mod pattern_picker;
pub mod query_form;
pub mod query_highlight;
pub mod quit_dialog;
pub mod results_table;

pub use error_dialog::ErrorDialog;
pub use feature_selector::FeatureSelectorDialog;
pub use help_dialog::HelpDialog;
pub use history_dialog::HistoryDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use pattern_picker::PatternPickerDialog;
pub use query_form::QueryFormComponent;
pub use quit_dialog::QuitDialog;
pub use results_table::ResultsTableComponent;
