//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; polls background requests
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // API Requests
    // ─────────────────────────────────────────────────────────────────────────
    /// Fetch the available features from the server
    FetchFeatures,
    /// Submit the form as a query
    SubmitQuery,

    // ─────────────────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────────────────
    /// Move focus to the query input
    FocusForm,
    /// Move focus to the results table
    FocusTable,
    /// Show or hide the form panel
    ToggleForm,
    /// Add character to the query
    QueryInput(char),
    /// Remove last character from the query
    QueryBackspace,
    /// Clear the query text
    ClearQuery,

    // ─────────────────────────────────────────────────────────────────────────
    // Table
    // ─────────────────────────────────────────────────────────────────────────
    /// Move cursor to next row
    NextRow,
    /// Move cursor to previous row
    PrevRow,
    /// Move cursor to next column
    NextColumn,
    /// Move cursor to previous column
    PrevColumn,
    /// Cycle sort on the cursor column
    CycleSort,
    /// Show next page
    NextPage,
    /// Show previous page
    PrevPage,
    /// Jump to first page
    FirstPage,
    /// Jump to last page
    LastPage,
    /// Cycle rows per page through 10, 20, 30
    CyclePageSize,
    /// Export the result set as CSV
    ExportCsv,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open feature selector
    OpenFeatureSelector,
    /// Select or deselect a feature
    ToggleFeature(String),
    /// Open query pattern picker
    OpenPatternPicker,
    /// Replace the query with the pattern at this index
    ApplyPattern(usize),
    /// Open session query history
    OpenHistory,
    /// Load the history entry at this index into the form
    RestoreQuery(usize),
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal (e.g., previous option)
    ModalUp,
    /// Navigate down in modal (e.g., next option)
    ModalDown,
    /// Close the error dialog
    DismissError,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::FetchFeatures => write!(f, "FetchFeatures"),
            Action::SubmitQuery => write!(f, "SubmitQuery"),
            Action::FocusForm => write!(f, "FocusForm"),
            Action::FocusTable => write!(f, "FocusTable"),
            Action::ToggleForm => write!(f, "ToggleForm"),
            Action::QueryInput(c) => write!(f, "QueryInput('{}')", c),
            Action::QueryBackspace => write!(f, "QueryBackspace"),
            Action::ClearQuery => write!(f, "ClearQuery"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::CycleSort => write!(f, "CycleSort"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::FirstPage => write!(f, "FirstPage"),
            Action::LastPage => write!(f, "LastPage"),
            Action::CyclePageSize => write!(f, "CyclePageSize"),
            Action::ExportCsv => write!(f, "ExportCsv"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenFeatureSelector => write!(f, "OpenFeatureSelector"),
            Action::ToggleFeature(name) => write!(f, "ToggleFeature({})", name),
            Action::OpenPatternPicker => write!(f, "OpenPatternPicker"),
            Action::ApplyPattern(i) => write!(f, "ApplyPattern({})", i),
            Action::OpenHistory => write!(f, "OpenHistory"),
            Action::RestoreQuery(i) => write!(f, "RestoreQuery({})", i),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::DismissError => write!(f, "DismissError"),
        }
    }
}
