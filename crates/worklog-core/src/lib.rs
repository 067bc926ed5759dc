//! Worklog Core Library
//!
//! Turns calendar events and their meeting notes into daily and weekly work
//! reports: keyword classification, note segmentation, grouping and
//! rendering, plus the seams (`source`) a backend implements to feed and
//! receive a report run.

pub mod compile;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod holiday;
pub mod linking;
pub mod obs;
pub mod pipeline;
pub mod render;
pub mod reporting;
pub mod retry;
pub mod segment;
pub mod source;
pub mod telemetry;
pub mod window;

pub use compile::{group_by_category, CompileInput, ReportCompiler};
pub use config::ReportSettings;
pub use domain::{
    classify, Category, CategoryGroup, Event, NoteDocument, NoteSection, Report, ReportItem,
    ReportPeriod, Result, WorklogError, GENERIC_COMPLETION, UNTITLED_EVENT,
};
pub use holiday::{HolidayCalendar, YearCalendar};
pub use linking::{is_note_for, match_note_document};
pub use pipeline::{PipelineOutcome, ReportPipeline, ReportRequest};
pub use render::{render, RenderStyle, ReportRenderer, ReportTemplate};
pub use reporting::{
    render_summary_text, write_rendered_report, write_summary_json, RunStatus, RunSummary,
};
pub use retry::{Backoff, RetryError, RetryPolicy};
pub use segment::segment;
pub use source::{CalendarSource, NoteStore, PublishedReport, ReportSink};
pub use telemetry::init_tracing;
pub use window::ReportWindow;

/// Worklog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
