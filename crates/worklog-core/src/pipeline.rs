//! One report run: fetch, link, compile, render, publish.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::compile::{CompileInput, ReportCompiler};
use crate::domain::{NoteDocument, ReportPeriod, Result};
use crate::linking::match_note_document;
use crate::obs;
use crate::render::{render, RenderStyle, ReportTemplate};
use crate::reporting::{RunStatus, RunSummary};
use crate::retry::RetryPolicy;
use crate::source::{CalendarSource, NoteStore, PublishedReport, ReportSink};
use crate::window::ReportWindow;

/// What to produce.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub period: ReportPeriod,
    /// The run's "now": picks the window and stamps the report.
    pub reference: DateTime<FixedOffset>,
    pub style: RenderStyle,
    /// Render only; never touch the sink.
    pub dry_run: bool,
    /// Publish even when a report with the same title exists.
    pub overwrite: bool,
}

impl ReportRequest {
    pub fn new(period: ReportPeriod, reference: DateTime<FixedOffset>) -> Self {
        Self {
            period,
            reference,
            style: RenderStyle::Styled,
            dry_run: false,
            overwrite: false,
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Result of [`ReportPipeline::run`].
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub summary: RunSummary,
    /// Rendered report text; `None` only when the run stopped before
    /// compiling.
    pub rendered: Option<String>,
}

/// Drives a report run against injected collaborators.
pub struct ReportPipeline {
    calendar: Arc<dyn CalendarSource>,
    notes: Arc<dyn NoteStore>,
    sink: Arc<dyn ReportSink>,
    retry: RetryPolicy,
}

impl ReportPipeline {
    pub fn new(
        calendar: Arc<dyn CalendarSource>,
        notes: Arc<dyn NoteStore>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            calendar,
            notes,
            sink,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run once.
    ///
    /// Fails only when the calendar cannot be read or the sink rejects the
    /// report; note problems degrade to placeholder content.
    pub async fn run(&self, request: &ReportRequest) -> Result<PipelineOutcome> {
        let run_id = Uuid::new_v4();
        let span = obs::run_span(&run_id, request.period);
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, request: &ReportRequest) -> Result<PipelineOutcome> {
        let started = Instant::now();
        let window = ReportWindow::for_period(request.period, request.reference);
        obs::emit_run_started(
            window.start_timestamp(),
            window.end_timestamp(),
            request.dry_run,
        );

        let events = self
            .retry
            .run("fetch events", || self.calendar.events(&window))
            .await
            .map_err(|e| e.into_last_error())?;
        obs::emit_events_fetched(events.len());

        let template = ReportTemplate::for_period(request.period);
        let report_date = request.reference.date_naive();
        let title = template.document_title(report_date);
        let mut summary = RunSummary {
            run_id,
            status: RunStatus::SkippedNoEvents,
            period: request.period,
            report_date,
            generated_at: request.reference,
            title: title.clone(),
            style: request.style,
            event_count: events.len(),
            linked_notes: 0,
            categories: Vec::new(),
            document: None,
        };

        if events.is_empty() && request.period == ReportPeriod::Daily {
            obs::emit_run_skipped("no events");
            return Ok(self.finish(started, summary, None));
        }

        let documents = match self
            .retry
            .run("list notes", || self.notes.list_documents())
            .await
        {
            Ok(docs) => docs,
            Err(err) => {
                warn!(error = %err, "note listing failed, continuing without notes");
                Vec::new()
            }
        };

        let mut inputs = Vec::with_capacity(events.len());
        for event in events {
            let input = match match_note_document(&event, &documents) {
                Some(doc) => {
                    summary.linked_notes += 1;
                    let text = self.read_note(event.title(), doc).await;
                    CompileInput::bare(event).with_note(doc.name.clone(), text)
                }
                None => {
                    debug!(title = event.title(), "no meeting note linked");
                    CompileInput::bare(event)
                }
            };
            inputs.push(input);
        }

        let report = ReportCompiler::new(request.period, request.reference).compile(inputs);
        summary.categories = report.categories();
        let rendered = render(&report, request.style);

        if request.dry_run {
            summary.status = RunStatus::DryRun;
            return Ok(self.finish(started, summary, Some(rendered)));
        }

        if !request.overwrite {
            if let Some(existing) = self
                .retry
                .run("check existing report", || {
                    self.sink.find_existing(request.period, &title)
                })
                .await
                .map_err(|e| e.into_last_error())?
            {
                obs::emit_run_skipped("already published");
                summary.status = RunStatus::SkippedAlreadyPublished;
                summary.document = Some(existing);
                return Ok(self.finish(started, summary, Some(rendered)));
            }
        }

        let published: PublishedReport = self
            .sink
            .publish(request.period, &title, &rendered, request.style)
            .await?;
        obs::emit_report_published(&published.title, &published.url);
        summary.status = RunStatus::Published;
        summary.document = Some(published);
        Ok(self.finish(started, summary, Some(rendered)))
    }

    async fn read_note(&self, event_title: &str, doc: &NoteDocument) -> Option<String> {
        match self
            .retry
            .run("read note", || self.notes.read_text(doc))
            .await
        {
            Ok(text) => Some(text),
            Err(err) => {
                obs::emit_note_degraded(event_title, &doc.name, &err);
                None
            }
        }
    }

    fn finish(
        &self,
        started: Instant,
        summary: RunSummary,
        rendered: Option<String>,
    ) -> PipelineOutcome {
        obs::emit_run_finished(
            started.elapsed().as_millis() as u64,
            summary.event_count,
            summary.status.as_str(),
        );
        PipelineOutcome { summary, rendered }
    }
}
