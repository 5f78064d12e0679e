//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - The GBD server HTTP API
//! - Background job execution
//! - CSV export of result sets

pub mod api;
pub mod export;
pub mod job_runner;

pub use api::{GbdApi, HttpClient, Origin};
pub use export::export_results;
pub use job_runner::JobRunner;
