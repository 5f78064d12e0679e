//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `ViewModel` - Form, results and table state of the query screen
//! - `QueryHistory` - Queries submitted during this session
//! - `ModalStack` - Modal overlay management

pub mod form;
pub mod history;
pub mod modal;
pub mod result;
pub mod table;
pub mod ui;
pub mod view_model;

// Re-export commonly used types
pub use form::{FeatureOption, FormState, QueryForm, QueryPattern, QUERY_PATTERNS};
pub use history::{QueryHistory, QueryOutcome};
pub use result::ResultRow;
pub use table::{PageSize, SortDirection};
pub use view_model::ViewModel;
