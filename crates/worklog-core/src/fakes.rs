//! In-memory fakes for the collaborator traits (testing only)
//!
//! Provides `MemoryCalendar`, `MemoryNoteStore` and `MemoryReportSink` that
//! satisfy the trait contracts without any network access. Each can be told
//! to fail a number of times to exercise retry and degradation paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Event, NoteDocument, ReportPeriod, Result, WorklogError};
use crate::render::RenderStyle;
use crate::source::{CalendarSource, NoteStore, PublishedReport, ReportSink};
use crate::window::ReportWindow;

/// Decrements a failure budget; `true` while failures remain.
fn take_failure(budget: &Mutex<u32>) -> bool {
    let mut left = budget.lock().unwrap();
    if *left > 0 {
        *left -= 1;
        true
    } else {
        false
    }
}

// ---------------------------------------------------------------------------
// MemoryCalendar
// ---------------------------------------------------------------------------

/// Calendar backed by a fixed list of events.
#[derive(Debug, Default)]
pub struct MemoryCalendar {
    events: Vec<Event>,
    failures: Mutex<u32>,
    calls: Mutex<u32>,
}

impl MemoryCalendar {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Fail the next `n` calls.
    pub fn failing(self, n: u32) -> Self {
        *self.failures.lock().unwrap() = n;
        self
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CalendarSource for MemoryCalendar {
    async fn events(&self, window: &ReportWindow) -> Result<Vec<Event>> {
        *self.calls.lock().unwrap() += 1;
        if take_failure(&self.failures) {
            return Err(WorklogError::Source("calendar unavailable".to_string()));
        }
        Ok(self
            .events
            .iter()
            .filter(|e| window.contains(e.start_time()))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MemoryNoteStore
// ---------------------------------------------------------------------------

/// Note store backed by documents and a token → text map.
///
/// Reading a document with no stored text fails.
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    documents: Vec<NoteDocument>,
    texts: HashMap<String, String>,
    list_failures: Mutex<u32>,
    reads: Mutex<Vec<String>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, doc: NoteDocument, text: Option<&str>) -> Self {
        if let Some(text) = text {
            self.texts.insert(doc.token.clone(), text.to_string());
        }
        self.documents.push(doc);
        self
    }

    /// Fail the next `n` listings.
    pub fn failing_list(self, n: u32) -> Self {
        *self.list_failures.lock().unwrap() = n;
        self
    }

    /// Tokens passed to `read_text`, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list_documents(&self) -> Result<Vec<NoteDocument>> {
        if take_failure(&self.list_failures) {
            return Err(WorklogError::NoteStore("drive unavailable".to_string()));
        }
        Ok(self.documents.clone())
    }

    async fn read_text(&self, doc: &NoteDocument) -> Result<String> {
        self.reads.lock().unwrap().push(doc.token.clone());
        self.texts
            .get(&doc.token)
            .cloned()
            .ok_or_else(|| WorklogError::NoteStore(format!("cannot read {}", doc.token)))
    }
}

// ---------------------------------------------------------------------------
// MemoryReportSink
// ---------------------------------------------------------------------------

/// A report captured by [`MemoryReportSink::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedReport {
    pub period: ReportPeriod,
    pub title: String,
    pub rendered: String,
    pub style: RenderStyle,
}

/// Sink that keeps published reports in memory.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    published: Mutex<Vec<CapturedReport>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a report with `title` was published earlier.
    pub fn with_existing(self, period: ReportPeriod, title: &str) -> Self {
        self.published.lock().unwrap().push(CapturedReport {
            period,
            title: title.to_string(),
            rendered: String::new(),
            style: RenderStyle::Plain,
        });
        self
    }

    pub fn published(&self) -> Vec<CapturedReport> {
        self.published.lock().unwrap().clone()
    }

    fn document(idx: usize, title: &str) -> PublishedReport {
        let document_id = format!("doc-{}", idx + 1);
        PublishedReport {
            url: format!("memory://docx/{document_id}"),
            document_id,
            title: title.to_string(),
        }
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn find_existing(
        &self,
        period: ReportPeriod,
        title: &str,
    ) -> Result<Option<PublishedReport>> {
        let published = self.published.lock().unwrap();
        Ok(published
            .iter()
            .position(|r| r.period == period && r.title == title)
            .map(|idx| Self::document(idx, title)))
    }

    async fn publish(
        &self,
        period: ReportPeriod,
        title: &str,
        rendered: &str,
        style: RenderStyle,
    ) -> Result<PublishedReport> {
        let mut published = self.published.lock().unwrap();
        published.push(CapturedReport {
            period,
            title: title.to_string(),
            rendered: rendered.to_string(),
            style,
        });
        Ok(Self::document(published.len() - 1, title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[tokio::test]
    async fn test_memory_calendar_filters_by_window() {
        let inside = Event::new("运维", tz().with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap());
        let outside = Event::new("培训", tz().with_ymd_and_hms(2026, 3, 3, 10, 0, 0).unwrap());
        let cal = MemoryCalendar::new(vec![inside.clone(), outside]);
        let window = ReportWindow::for_period(ReportPeriod::Daily, inside.start_time());
        assert_eq!(cal.events(&window).await.unwrap(), vec![inside]);
    }

    #[tokio::test]
    async fn test_memory_calendar_failure_budget() {
        let cal = MemoryCalendar::new(Vec::new()).failing(1);
        let window = ReportWindow::for_period(
            ReportPeriod::Daily,
            tz().with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        );
        assert!(cal.events(&window).await.is_err());
        assert!(cal.events(&window).await.is_ok());
        assert_eq!(cal.calls(), 2);
    }

    #[tokio::test]
    async fn test_memory_sink_finds_existing_by_period_and_title() {
        let sink = MemoryReportSink::new().with_existing(ReportPeriod::Daily, "2026-03-02_日报");
        assert!(sink
            .find_existing(ReportPeriod::Daily, "2026-03-02_日报")
            .await
            .unwrap()
            .is_some());
        assert!(sink
            .find_existing(ReportPeriod::Weekly, "2026-03-02_日报")
            .await
            .unwrap()
            .is_none());
    }
}
