//! Error types for worklog-feishu

use thiserror::Error;
use worklog_core::WorklogError;

/// Errors that can occur talking to the Feishu Open API
#[derive(Error, Debug)]
pub enum FeishuError {
    /// Transport failure or non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-zero `code`
    #[error("Feishu API error {code}: {msg}")]
    Api { code: i64, msg: String },

    /// A field the client relies on was absent from a response
    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    /// A required setting (token, calendar, folder) is not set
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp string that is not unix seconds
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<reqwest::Error> for FeishuError {
    fn from(err: reqwest::Error) -> Self {
        FeishuError::Http(err.to_string())
    }
}

/// Result type for Feishu operations
pub type Result<T> = std::result::Result<T, FeishuError>;

/// Map a client error onto the core seam it surfaced from.
pub(crate) fn into_core(err: FeishuError, seam: fn(String) -> WorklogError) -> WorklogError {
    match err {
        FeishuError::NotConfigured(what) => {
            WorklogError::InvalidConfig(format!("feishu: {what} is not set"))
        }
        other => seam(other.to_string()),
    }
}
