//! Application error model
//!
//! Defines a typed error hierarchy using `thiserror`. Nothing in this crate
//! is allowed to terminate the process: remote failures degrade to partial
//! results with a warning, and user input errors are reported and retried.

use thiserror::Error;

/// Application error type
///
/// Covers all error cases the mail cache core may encounter. Variants are
/// coarse; callers only need to distinguish recoverable input errors from
/// collaborator failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid user input (validation failed, malformed request)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Remote source failure (transport or provider error during fetch)
    #[error("remote fetch failed: {0}")]
    Remote(String),
    /// Render failure (preview file could not be written or opened)
    #[error("render failed: {0}")]
    Render(String),
    /// Internal error (unexpected failure, external crate error)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for `InvalidInput`
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Type alias for fallible return values
///
/// Use this for all internal functions that can fail. Provides a consistent
/// error type throughout the codebase.
pub type AppResult<T> = Result<T, AppError>;
