//! Calendar events and note documents as seen by the compiler.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::category::{classify, Category};

/// Title used when the calendar returns an event without a summary.
pub const UNTITLED_EVENT: &str = "(无标题)";

/// A calendar event.
///
/// The category is derived from the title at construction and the event is
/// immutable afterwards, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    title: String,
    start_time: DateTime<FixedOffset>,
    category: Category,
}

impl Event {
    /// Build an event and classify its title.
    ///
    /// An empty title is replaced by [`UNTITLED_EVENT`]; whitespace-only
    /// titles are kept as given.
    pub fn new(title: impl Into<String>, start_time: DateTime<FixedOffset>) -> Self {
        let mut title = title.into();
        if title.is_empty() {
            title = UNTITLED_EVENT.to_string();
        }
        let category = classify(Some(&title));
        Self {
            title,
            start_time,
            category,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Calendar date of the start time in the event's own offset.
    pub fn start_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// A drive file that may hold the meeting notes for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDocument {
    /// Opaque document token used to read the content.
    pub token: String,
    /// File name as shown in the drive.
    pub name: String,
    /// Drive file type (`docx`, `sheet`, `folder`, ...).
    pub kind: String,
    pub created_at: DateTime<FixedOffset>,
}

impl NoteDocument {
    pub fn is_docx(&self) -> bool {
        self.kind == "docx"
    }
}
