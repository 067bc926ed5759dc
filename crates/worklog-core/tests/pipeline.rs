use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use worklog_core::fakes::{MemoryCalendar, MemoryNoteStore, MemoryReportSink};
use worklog_core::{
    Event, NoteDocument, RenderStyle, ReportPeriod, ReportPipeline, ReportRequest, RetryPolicy,
    RunStatus, WorklogError, GENERIC_COMPLETION,
};

fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, day, hour, 0, 0)
        .unwrap()
}

fn doc(token: &str, name: &str, created: DateTime<FixedOffset>) -> NoteDocument {
    NoteDocument {
        token: token.to_string(),
        name: name.to_string(),
        kind: "docx".to_string(),
        created_at: created,
    }
}

fn pipeline(
    calendar: &Arc<MemoryCalendar>,
    notes: &Arc<MemoryNoteStore>,
    sink: &Arc<MemoryReportSink>,
) -> ReportPipeline {
    ReportPipeline::new(calendar.clone(), notes.clone(), sink.clone())
        .with_retry(RetryPolicy::fixed(3, Duration::from_millis(10)))
}

#[tokio::test]
async fn daily_without_events_is_skipped() {
    let calendar = Arc::new(MemoryCalendar::new(vec![Event::new("培训", at(3, 10))]));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new());

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Daily, at(2, 18)))
        .await
        .unwrap();

    assert_eq!(outcome.summary.status, RunStatus::SkippedNoEvents);
    assert!(outcome.rendered.is_none());
    assert!(sink.published().is_empty());
}

#[tokio::test]
async fn weekly_without_events_still_publishes() {
    let calendar = Arc::new(MemoryCalendar::new(Vec::new()));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new());

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Weekly, at(6, 18)))
        .await
        .unwrap();

    assert_eq!(outcome.summary.status, RunStatus::Published);
    assert_eq!(sink.published()[0].title, "2026-03-06_周报");
}

#[tokio::test]
async fn publishes_linked_notes_and_placeholders() {
    let calendar = Arc::new(MemoryCalendar::new(vec![
        Event::new("标签加工 2026年3月2日", at(2, 9)),
        Event::new("午餐", at(2, 12)),
    ]));
    let notes = Arc::new(
        MemoryNoteStore::new()
            .with_document(doc("d-old", "标签加工", at(1, 9)), Some("• 昨天的内容"))
            .with_document(
                doc("d-1", "标签加工 纪要", at(2, 10)),
                Some("ads_tag_result\n• 新增字段"),
            ),
    );
    let sink = Arc::new(MemoryReportSink::new());

    let request = ReportRequest::new(ReportPeriod::Daily, at(2, 18)).with_style(RenderStyle::Plain);
    let outcome = pipeline(&calendar, &notes, &sink).run(&request).await.unwrap();

    assert_eq!(outcome.summary.status, RunStatus::Published);
    assert_eq!(outcome.summary.event_count, 2);
    assert_eq!(outcome.summary.linked_notes, 1);
    assert_eq!(notes.reads(), vec!["d-1".to_string()]);

    let published = sink.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].title, "2026-03-02_日报");
    assert_eq!(published[0].style, RenderStyle::Plain);
    assert_eq!(Some(&published[0].rendered), outcome.rendered.as_ref());
    assert!(published[0].rendered.contains("      □ ads_tag_result\n         • 新增字段"));
    assert!(!published[0].rendered.contains("昨天的内容"));
    assert!(published[0].rendered.contains(&format!("      • {GENERIC_COMPLETION}")));
    assert_eq!(
        outcome.summary.document.as_ref().map(|d| d.url.as_str()),
        Some("memory://docx/doc-1")
    );
}

#[tokio::test]
async fn existing_report_is_skipped_unless_overwrite() {
    let calendar = Arc::new(MemoryCalendar::new(vec![Event::new("运维", at(2, 9))]));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new().with_existing(ReportPeriod::Daily, "2026-03-02_日报"));
    let p = pipeline(&calendar, &notes, &sink);

    let request = ReportRequest::new(ReportPeriod::Daily, at(2, 18));
    let skipped = p.run(&request).await.unwrap();
    assert_eq!(skipped.summary.status, RunStatus::SkippedAlreadyPublished);
    assert!(skipped.rendered.is_some());
    assert_eq!(sink.published().len(), 1);

    let forced = p.run(&request.clone().overwrite(true)).await.unwrap();
    assert_eq!(forced.summary.status, RunStatus::Published);
    assert_eq!(sink.published().len(), 2);
}

#[tokio::test]
async fn dry_run_never_touches_the_sink() {
    let calendar = Arc::new(MemoryCalendar::new(vec![Event::new("运维", at(2, 9))]));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new().with_existing(ReportPeriod::Daily, "2026-03-02_日报"));

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Daily, at(2, 18)).dry_run(true))
        .await
        .unwrap();

    assert_eq!(outcome.summary.status, RunStatus::DryRun);
    assert!(outcome.summary.document.is_none());
    assert!(outcome.rendered.unwrap().starts_with("【H1】工作日报（2026-03-02 星期一）"));
    assert_eq!(sink.published().len(), 1);
}

#[tokio::test]
async fn unreadable_note_degrades_to_placeholder() {
    let calendar = Arc::new(MemoryCalendar::new(vec![Event::new("沟通会", at(2, 15))]));
    let notes = Arc::new(
        MemoryNoteStore::new().with_document(doc("d-9", "沟通会", at(2, 16)), None),
    );
    let sink = Arc::new(MemoryReportSink::new());

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Daily, at(2, 18)).with_style(RenderStyle::Markdown))
        .await
        .unwrap();

    // one read per attempt
    assert_eq!(notes.reads().len(), 3);
    let rendered = outcome.rendered.unwrap();
    assert!(rendered.contains("### 沟通会（15:00）\n📄 纪要：沟通会\n"));
    assert!(rendered.contains(&format!("- {GENERIC_COMPLETION}")));
}

#[tokio::test]
async fn note_listing_failure_degrades_to_no_notes() {
    let calendar = Arc::new(MemoryCalendar::new(vec![Event::new("沟通会", at(2, 15))]));
    let notes = Arc::new(
        MemoryNoteStore::new()
            .with_document(doc("d-9", "沟通会", at(2, 16)), Some("• 有内容"))
            .failing_list(5),
    );
    let sink = Arc::new(MemoryReportSink::new());

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Daily, at(2, 18)))
        .await
        .unwrap();

    assert_eq!(outcome.summary.status, RunStatus::Published);
    assert_eq!(outcome.summary.linked_notes, 0);
    assert!(notes.reads().is_empty());
}

#[tokio::test]
async fn transient_calendar_failures_are_retried() {
    let calendar =
        Arc::new(MemoryCalendar::new(vec![Event::new("运维", at(2, 9))]).failing(2));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new());

    let outcome = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Daily, at(2, 18)))
        .await
        .unwrap();

    assert_eq!(calendar.calls(), 3);
    assert_eq!(outcome.summary.status, RunStatus::Published);
}

#[tokio::test]
async fn persistent_calendar_failure_aborts_the_run() {
    let calendar = Arc::new(MemoryCalendar::new(Vec::new()).failing(10));
    let notes = Arc::new(MemoryNoteStore::new());
    let sink = Arc::new(MemoryReportSink::new());

    let err = pipeline(&calendar, &notes, &sink)
        .run(&ReportRequest::new(ReportPeriod::Weekly, at(6, 18)))
        .await
        .unwrap_err();

    assert!(matches!(err, WorklogError::Source(_)));
    assert_eq!(calendar.calls(), 3);
    assert!(sink.published().is_empty());
}
