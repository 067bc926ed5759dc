//! Domain models for worklog.
//!
//! Canonical definitions for the core entities:
//! - `Category`: Task category and the keyword classifier
//! - `Event`: Calendar event with its derived category
//! - `NoteSection`: Segment of a meeting note
//! - `Report`: Compiled report grouped by category

pub mod category;
pub mod error;
pub mod event;
pub mod report;

// Re-export main types and errors
pub use category::{classify, Category};
pub use error::{Result, WorklogError};
pub use event::{Event, NoteDocument, UNTITLED_EVENT};
pub use report::{
    CategoryGroup, NoteSection, Report, ReportItem, ReportPeriod, GENERIC_COMPLETION,
};
