//! Error types for the dashboard.
//!
//! Configuration errors are fatal at startup. Authentication and fetch
//! errors are recoverable: the caller shows a message and carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required secret is not set in the environment or `.env`.
    #[error("missing configuration value '{0}'")]
    Missing(&'static str),

    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("incorrect password")]
    WrongPassword,

    #[error("not logged in")]
    NotLoggedIn,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid request: {0}")]
    Request(String),

    #[error("failed to decode records: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),
}
