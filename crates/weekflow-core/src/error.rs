//! Core error types for weekflow-core.
//!
//! The schedule analysis itself is total: degenerate inputs (empty weeks,
//! nothing movable) produce valid, unchanged results rather than errors.
//! Errors only surface at the remote-strategy boundary and when a remote
//! payload fails to parse.

use thiserror::Error;

/// Core error type for weekflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote optimization strategy errors
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Remote-strategy-specific errors.
///
/// Every variant means "optimization unavailable" to the caller; none of
/// them should abort a request that can fall back to the local optimizer.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// No credentials were supplied for the remote strategy
    #[error("No API key configured for the remote strategy")]
    MissingApiKey,

    /// Transport-level failure
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote endpoint did not answer in time
    #[error("Remote request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The remote endpoint answered with a non-success status
    #[error("Remote endpoint returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// The remote answer could not be interpreted as an optimization plan
    #[error("Remote response could not be interpreted: {0}")]
    InvalidResponse(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value for a field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<tokio::time::error::Elapsed> for StrategyError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StrategyError::Timeout { timeout_secs: 30 }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
