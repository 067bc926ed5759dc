//! Collaborator seams of a report run.
//!
//! These traits define where a run gets its input and where the result goes:
//! - `CalendarSource`: events inside a reporting window
//! - `NoteStore`: meeting-note documents and their text
//! - `ReportSink`: publishing the rendered report as a document
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Event, NoteDocument, ReportPeriod, Result};
use crate::render::RenderStyle;
use crate::window::ReportWindow;

/// Supplies calendar events.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events starting inside `window`, in the order the backend returns
    /// them.
    async fn events(&self, window: &ReportWindow) -> Result<Vec<Event>>;
}

/// Supplies meeting-note documents.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Candidate documents, in listing order.
    async fn list_documents(&self) -> Result<Vec<NoteDocument>>;

    /// Plain text of one document, one line per paragraph.
    async fn read_text(&self, doc: &NoteDocument) -> Result<String>;
}

/// A report document that exists at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedReport {
    pub document_id: String,
    pub title: String,
    pub url: String,
}

/// Destination of rendered reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// An already published report of `period` with exactly this title.
    async fn find_existing(
        &self,
        period: ReportPeriod,
        title: &str,
    ) -> Result<Option<PublishedReport>>;

    /// Create a document named `title` holding `rendered`.
    ///
    /// `style` tells the sink how `rendered` is laid out so it can map lines
    /// to document blocks.
    async fn publish(
        &self,
        period: ReportPeriod,
        title: &str,
        rendered: &str,
        style: RenderStyle,
    ) -> Result<PublishedReport>;
}
