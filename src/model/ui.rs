//! UI state - presentation state separate from the view-model

/// Which panel receives key input when no modal is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Query text input
    #[default]
    Form,
    /// Results table navigation
    Table,
}
