//! Markdown layout.

use super::template::{when_label, PlanBlock, ReportTemplate, GENERATED_TAG, RISKS_HEADING};
use super::ReportRenderer;
use crate::domain::Report;

/// Renders the report as Markdown with `#`/`##`/`###` headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report) -> String {
        let template = ReportTemplate::for_period(report.period);
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", template.heading(report.report_date)));
        out.push_str(&format!("# {}\n\n", template.progress_heading));

        for (idx, group) in report.groups.iter().enumerate() {
            out.push_str(&format!("## {}. {}\n\n", idx + 1, group.category));
            for item in &group.items {
                out.push_str(&format!(
                    "### {}（{}）\n",
                    item.event.title(),
                    when_label(report.period, &item.event)
                ));
                if let Some(name) = &item.linked_document_name {
                    out.push_str(&format!("📄 纪要：{}\n", name));
                }
                out.push('\n');

                for section in &item.sections {
                    if let Some(title) = &section.title {
                        out.push_str(&format!("**{}**\n\n", title));
                    }
                    for entry in &section.items {
                        out.push_str(&format!("- {}\n", entry));
                    }
                    out.push('\n');
                }
            }
        }

        out.push_str(&format!("# {}\n\n", RISKS_HEADING));
        out.push_str(&format!("{}\n\n", template.no_risk));
        for watch in template.watch_items {
            out.push_str(&format!("- {}\n", watch));
        }
        out.push('\n');

        out.push_str(&format!("# {}\n\n", template.plan_heading));
        match template.plan(report) {
            PlanBlock::Fixed(steps) => {
                for (n, step) in steps.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", n + 1, step));
                }
                out.push('\n');
            }
            PlanBlock::PerCategory(groups) => {
                for (idx, (category, steps)) in groups.iter().enumerate() {
                    out.push_str(&format!("## {}. {}\n\n", idx + 1, category));
                    for (n, step) in steps.iter().enumerate() {
                        out.push_str(&format!("{}. {}\n", n + 1, step));
                    }
                    out.push('\n');
                }
            }
        }

        out.push_str("---\n\n");
        out.push_str(&format!("*{}*\n", template.footer(report.generated_at)));
        out.push_str(&format!("*{}*\n", GENERATED_TAG));
        out
    }
}
