//! Incident Logging
//!
//! Append-only, deduplicated record of detected violations, flushed to a
//! run-timestamped CSV report under the results directory at shutdown.

mod report;

pub use report::{Incident, IncidentLog, Violation};

use thiserror::Error;

/// Incident log error types
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
