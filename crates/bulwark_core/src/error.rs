//! Error types for the gameplay core.
//!
//! Runtime grid and queue operations never raise - they report success
//! through booleans and log rejected inputs. Errors here cover the
//! load-time surface: data records and simulation configuration.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Top-level error type for data and configuration failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A data record failed validation on load.
    #[error("Invalid {record} data: {message}")]
    DataValidation {
        /// Which record kind was rejected (unit, weapon, ...).
        record: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParse {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Simulation configuration rejected at construction.
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
}
