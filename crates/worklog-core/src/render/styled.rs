//! Marker-tagged lines for styled document upload.
//!
//! Each output line carries its presentation in a prefix that the upload
//! side maps to a docx block style:
//!
//! | prefix | meaning |
//! |---|---|
//! | `【H1】` | chapter heading |
//! | `【H2】` | category heading |
//! | `【H3】` | task heading |
//! | `【SUB】` | sub-task (table) heading |
//! | `- ` | bullet |

use super::template::{when_label, PlanBlock, ReportTemplate, GENERATED_TAG, RISKS_HEADING};
use super::ReportRenderer;
use crate::domain::Report;

pub const H1: &str = "【H1】";
pub const H2: &str = "【H2】";
pub const H3: &str = "【H3】";
pub const SUB: &str = "【SUB】";

#[derive(Debug, Clone, Copy, Default)]
pub struct StyledLinesRenderer;

impl ReportRenderer for StyledLinesRenderer {
    fn render(&self, report: &Report) -> String {
        let template = ReportTemplate::for_period(report.period);
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("{H1}{}", template.heading(report.report_date)));
        lines.push(String::new());
        lines.push(format!("{H1}{}", template.progress_heading));
        lines.push(String::new());

        for (idx, group) in report.groups.iter().enumerate() {
            lines.push(format!("{H2}{}. {}", idx + 1, group.category));
            lines.push(String::new());

            for item in &group.items {
                lines.push(format!(
                    "{H3}{}（{}）",
                    item.event.title(),
                    when_label(report.period, &item.event)
                ));
                if let Some(name) = &item.linked_document_name {
                    lines.push(format!("📄 纪要：{name}"));
                }
                lines.push(String::new());

                for section in &item.sections {
                    if let Some(title) = &section.title {
                        lines.push(format!("{SUB}{title}"));
                    }
                    for entry in &section.items {
                        lines.push(format!("- {entry}"));
                    }
                    if section.title.is_some() {
                        lines.push(String::new());
                    }
                }
            }
        }

        lines.push(format!("{H1}{RISKS_HEADING}"));
        lines.push(String::new());
        lines.push(template.no_risk.to_string());
        for watch in template.watch_items {
            lines.push(format!("- {watch}"));
        }
        lines.push(String::new());

        lines.push(format!("{H1}{}", template.plan_heading));
        lines.push(String::new());
        match template.plan(report) {
            PlanBlock::Fixed(steps) => {
                for (n, step) in steps.iter().enumerate() {
                    lines.push(format!("{}. {}", n + 1, step));
                }
                lines.push(String::new());
            }
            PlanBlock::PerCategory(groups) => {
                for (idx, (category, steps)) in groups.iter().enumerate() {
                    lines.push(format!("{H2}{}. {}", idx + 1, category));
                    lines.push(String::new());
                    for (n, step) in steps.iter().enumerate() {
                        lines.push(format!("{}. {}", n + 1, step));
                    }
                    lines.push(String::new());
                }
            }
        }

        lines.push("---".to_string());
        lines.push(format!("*{}*", template.footer(report.generated_at)));
        lines.push(format!("*{GENERATED_TAG}*"));

        lines.join("\n")
    }
}
