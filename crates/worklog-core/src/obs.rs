//! Structured log events for the report run lifecycle.
//!
//! This module provides:
//! - A run-scoped span carrying the run id and period
//! - Emission functions for start, skip, publish and finish
//!
//! Events are emitted at `info!` level; filter with `RUST_LOG`.

use tracing::{info, warn, Span};
use uuid::Uuid;

use crate::domain::ReportPeriod;

/// Span that tags everything logged during one run.
///
/// Attach it with `tracing::Instrument` rather than entering it, so the run
/// future stays `Send`.
pub fn run_span(run_id: &Uuid, period: ReportPeriod) -> Span {
    tracing::info_span!("worklog.run", run_id = %run_id, period = %period)
}

/// Emit event: run started for a window.
pub fn emit_run_started(start_ts: i64, end_ts: i64, dry_run: bool) {
    info!(
        event = "run.started",
        window_start = start_ts,
        window_end = end_ts,
        dry_run = dry_run
    );
}

/// Emit event: events fetched from the calendar.
pub fn emit_events_fetched(count: usize) {
    info!(event = "run.events_fetched", count = count);
}

/// Emit event: run stopped without publishing.
pub fn emit_run_skipped(reason: &str) {
    info!(event = "run.skipped", reason = %reason);
}

/// Emit event: a note could not be read and the placeholder will be used.
pub fn emit_note_degraded(event_title: &str, document: &str, error: &dyn std::fmt::Display) {
    warn!(
        event = "run.note_degraded",
        event_title = %event_title,
        document = %document,
        error = %error
    );
}

/// Emit event: report document created.
pub fn emit_report_published(title: &str, url: &str) {
    info!(event = "run.published", title = %title, url = %url);
}

/// Emit event: run finished.
pub fn emit_run_finished(duration_ms: u64, event_count: usize, status: &str) {
    info!(
        event = "run.finished",
        duration_ms = duration_ms,
        event_count = event_count,
        status = %status
    );
}
