//! Configuration module for session settings
//!
//! All configuration is loaded from environment variables following the
//! pattern `MAIL_CACHE_<KEY>`. Every setting has a sensible default except
//! the mailbox fixture path, which the binary requires.

use std::env;
use std::env::VarError;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// Session-wide configuration
///
/// Holds defaults for the search coordinator and the render sink. Loaded
/// once at startup and passed by reference into the session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fetch limit applied when a search command carries no explicit limit
    pub default_limit: usize,
    /// Reserved query string that always forces a remote fetch
    pub unread_query: String,
    /// JSON mailbox fixture consumed by the demo remote source
    pub mailbox_file: PathBuf,
    /// Directory where HTML previews are written
    pub render_dir: PathBuf,
    /// Whether previews are opened with the system handler after writing
    pub open_browser: bool,
}

impl SessionConfig {
    /// Load all configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `MAIL_CACHE_MAILBOX_FILE` is missing or any
    /// set variable is malformed.
    ///
    /// # Example Environment
    ///
    /// ```text
    /// MAIL_CACHE_MAILBOX_FILE=./mailbox.json
    /// MAIL_CACHE_DEFAULT_LIMIT=50
    /// MAIL_CACHE_UNREAD_QUERY=is:unread
    /// MAIL_CACHE_OPEN_BROWSER=false
    /// ```
    pub fn load_from_env() -> AppResult<Self> {
        Ok(Self {
            default_limit: parse_usize_env("MAIL_CACHE_DEFAULT_LIMIT", 50)?,
            unread_query: optional_env("MAIL_CACHE_UNREAD_QUERY")?
                .unwrap_or_else(|| "is:unread".to_owned()),
            mailbox_file: PathBuf::from(required_env("MAIL_CACHE_MAILBOX_FILE")?),
            render_dir: optional_env("MAIL_CACHE_RENDER_DIR")?
                .map_or_else(env::temp_dir, PathBuf::from),
            open_browser: parse_bool_env("MAIL_CACHE_OPEN_BROWSER", true)?,
        })
    }
}

/// Read a required environment variable, returning error if missing or empty
fn required_env(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!(
            "missing required environment variable {key}"
        ))),
    }
}

/// Read an optional environment variable
///
/// Treats an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> AppResult<Option<String>> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(Some(v)),
        Ok(_) | Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(AppError::InvalidInput(format!(
            "environment variable {key} contains non-unicode data"
        ))),
    }
}

/// Parse a boolean environment variable with flexible values
///
/// Accepts: `1`, `true`, `yes`, `y`, `on` (truthy) or `0`, `false`, `no`,
/// `n`, `off` (falsy). Case-insensitive. Returns `default` if unset.
///
/// # Errors
///
/// Returns `InvalidInput` if the variable is set to an unrecognized value.
fn parse_bool_env(key: &str, default: bool) -> AppResult<bool> {
    match env::var(key) {
        Ok(v) => parse_bool_value(&v).ok_or_else(|| {
            AppError::InvalidInput(format!("invalid boolean environment variable {key}: '{v}'"))
        }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(AppError::InvalidInput(format!(
            "environment variable {key} contains non-unicode data"
        ))),
    }
}

fn parse_bool_value(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a `usize` environment variable with default fallback
///
/// Returns `default` if unset.
///
/// # Errors
///
/// Returns `InvalidInput` if the variable is set but not a valid `usize`.
fn parse_usize_env(key: &str, default: usize) -> AppResult<usize> {
    match env::var(key) {
        Ok(v) => v.parse::<usize>().map_err(|_| {
            AppError::InvalidInput(format!("invalid usize environment variable {key}: '{v}'"))
        }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(AppError::InvalidInput(format!(
            "environment variable {key} contains non-unicode data"
        ))),
    }
}
