use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::domain::{Category, ReportPeriod};
use crate::render::RenderStyle;
use crate::source::PublishedReport;

/// How a run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Published,
    DryRun,
    SkippedNoEvents,
    SkippedAlreadyPublished,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Published => "published",
            RunStatus::DryRun => "dry_run",
            RunStatus::SkippedNoEvents => "skipped_no_events",
            RunStatus::SkippedAlreadyPublished => "skipped_already_published",
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            RunStatus::SkippedNoEvents | RunStatus::SkippedAlreadyPublished
        )
    }
}

/// Machine-readable record of one report run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub period: ReportPeriod,
    pub report_date: NaiveDate,
    pub generated_at: DateTime<FixedOffset>,
    pub title: String,
    pub style: RenderStyle,
    pub event_count: usize,
    pub linked_notes: usize,
    pub categories: Vec<Category>,
    /// The document written by this run, or the one that caused a skip.
    pub document: Option<PublishedReport>,
}

/// Write the run summary in pretty JSON format.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let content = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Write the rendered report text as-is.
pub fn write_rendered_report(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Short human-readable account of a run for terminal output.
pub fn render_summary_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let headline = match summary.status {
        RunStatus::Published => "published",
        RunStatus::DryRun => "dry run, nothing published",
        RunStatus::SkippedNoEvents => "skipped: no events in window",
        RunStatus::SkippedAlreadyPublished => "skipped: report already exists",
    };
    out.push_str(&format!("{} {}: {}\n", summary.period, summary.title, headline));
    out.push_str(&format!(
        "- events: {}\n- linked notes: {}\n",
        summary.event_count, summary.linked_notes
    ));
    if !summary.categories.is_empty() {
        let labels: Vec<&str> = summary.categories.iter().map(|c| c.label()).collect();
        out.push_str(&format!("- categories: {}\n", labels.join(", ")));
    }
    if let Some(doc) = &summary.document {
        out.push_str(&format!("- document: {}\n", doc.url));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary() -> RunSummary {
        RunSummary {
            run_id: Uuid::parse_str("11111111-1111-1111-1111-111111111111").expect("valid UUID"),
            status: RunStatus::Published,
            period: ReportPeriod::Daily,
            report_date: NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
            generated_at: DateTime::parse_from_rfc3339("2026-03-02T18:00:00+08:00")
                .expect("parse RFC3339"),
            title: "2026-03-02_日报".to_string(),
            style: RenderStyle::Styled,
            event_count: 3,
            linked_notes: 1,
            categories: vec![Category::DataQuality, Category::DataProcessing],
            document: Some(PublishedReport {
                document_id: "doxcn123".to_string(),
                title: "2026-03-02_日报".to_string(),
                url: "https://example.feishu.cn/docx/doxcn123".to_string(),
            }),
        }
    }

    #[test]
    fn summary_schema_has_expected_keys() {
        let value = serde_json::to_value(summary()).expect("serialize summary");
        assert_eq!(value["status"], json!("published"));
        assert_eq!(value["period"], json!("daily"));
        assert_eq!(value["report_date"], json!("2026-03-02"));
        assert_eq!(value["style"], json!("styled"));
        assert_eq!(
            value["categories"],
            json!(["data_quality", "data_processing"])
        );
        assert_eq!(value["document"]["document_id"], json!("doxcn123"));
    }

    #[test]
    fn summary_text_lists_counts_and_link() {
        let text = render_summary_text(&summary());
        assert_eq!(
            text,
            "daily 2026-03-02_日报: published\n\
             - events: 3\n\
             - linked notes: 1\n\
             - categories: 数据质量, 数据加工\n\
             - document: https://example.feishu.cn/docx/doxcn123\n"
        );
    }

    #[test]
    fn write_summary_json_roundtrips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &summary()).expect("write summary");
        let back: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read back"))
                .expect("parse summary");
        assert_eq!(back, summary());
    }

    #[test]
    fn write_rendered_report_reports_bad_path() {
        let err = write_rendered_report(Path::new("/nonexistent/dir/report.txt"), "x")
            .expect_err("should fail");
        assert!(format!("{err:#}").contains("report.txt"));
    }
}
