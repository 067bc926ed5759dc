//! Domain-level error taxonomy for worklog.

/// Worklog domain errors.
///
/// Only the collaborator seams produce these; classification, segmentation
/// and rendering are total and never fail.
#[derive(Debug, thiserror::Error)]
pub enum WorklogError {
    #[error("event source error: {0}")]
    Source(String),

    #[error("note store error: {0}")]
    NoteStore(String),

    #[error("report sink error: {0}")]
    Sink(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid holiday data: {0}")]
    InvalidHolidayData(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for worklog domain operations.
pub type Result<T> = std::result::Result<T, WorklogError>;
