//! Plain-text layout with ruled section headers.

use super::template::{when_label, PlanBlock, ReportTemplate, GENERATED_TAG, RISKS_HEADING};
use super::ReportRenderer;
use crate::domain::{Report, ReportItem, ReportPeriod};

const RULE_WIDTH: usize = 60;

/// Renders the ruled plain-text report, one output line per document line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl ReportRenderer for PlainTextRenderer {
    fn render(&self, report: &Report) -> String {
        let template = ReportTemplate::for_period(report.period);
        let rule = "━".repeat(RULE_WIDTH);
        let mut lines: Vec<String> = Vec::new();

        lines.push(template.heading(report.report_date));
        lines.push(String::new());

        push_ruled_heading(&mut lines, &rule, template.progress_heading);
        for (idx, group) in report.groups.iter().enumerate() {
            lines.push(format!("{}. 【{}】", idx + 1, group.category));
            lines.push(String::new());
            for item in &group.items {
                push_item(&mut lines, report.period, item);
            }
        }

        push_ruled_heading(&mut lines, &rule, RISKS_HEADING);
        lines.push(template.no_risk.to_string());
        lines.push(String::new());
        lines.push("⚠ 需关注事项：".to_string());
        for watch in template.watch_items {
            lines.push(format!("   • {watch}"));
        }
        lines.push(String::new());

        push_ruled_heading(&mut lines, &rule, template.plan_heading);
        match template.plan(report) {
            PlanBlock::Fixed(steps) => {
                for (n, step) in steps.iter().enumerate() {
                    lines.push(format!("{}. {}", n + 1, step));
                }
                lines.push(String::new());
            }
            PlanBlock::PerCategory(groups) => {
                for (idx, (category, steps)) in groups.iter().enumerate() {
                    lines.push(format!("{}. 【{}】", idx + 1, category));
                    for (n, step) in steps.iter().enumerate() {
                        lines.push(format!("   {}. {}", n + 1, step));
                    }
                    lines.push(String::new());
                }
            }
        }

        lines.push(rule);
        lines.push(format!(
            "{}  |  {}",
            template.footer(report.generated_at),
            GENERATED_TAG
        ));

        lines.join("\n")
    }
}

fn push_ruled_heading(lines: &mut Vec<String>, rule: &str, heading: &str) {
    lines.push(rule.to_string());
    lines.push(heading.to_string());
    lines.push(rule.to_string());
    lines.push(String::new());
}

fn push_item(lines: &mut Vec<String>, period: ReportPeriod, item: &ReportItem) {
    let doc_tag = item
        .linked_document_name
        .as_ref()
        .map(|name| format!("  [📄 {name}]"))
        .unwrap_or_default();
    lines.push(format!(
        "   ▶ {}（{}）{}",
        item.event.title(),
        when_label(period, &item.event),
        doc_tag
    ));
    lines.push(String::new());

    for section in &item.sections {
        match &section.title {
            Some(title) => {
                lines.push(format!("      □ {title}"));
                for entry in &section.items {
                    lines.push(format!("         • {entry}"));
                }
            }
            None => {
                for entry in &section.items {
                    lines.push(format!("      • {entry}"));
                }
            }
        }
        lines.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileInput, ReportCompiler};
    use crate::domain::Event;
    use chrono::{FixedOffset, TimeZone};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_daily_plain_render_is_stable() {
        let at = |h, m| tz().with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();
        let report = ReportCompiler::new(ReportPeriod::Daily, at(18, 30)).compile(vec![
            CompileInput::bare(Event::new("标签加工", at(9, 0))).with_note(
                "标签加工 纪要",
                Some("ads_tag_result\n• 新增字段\n会后同步给业务方".to_string()),
            ),
            CompileInput::bare(Event::new("午餐", at(12, 0))),
        ]);

        let rule = "━".repeat(60);
        let expected = [
            "工作日报（2026-03-02 星期一）",
            "",
            &rule,
            "一、今日工作进度",
            &rule,
            "",
            "1. 【数据加工】",
            "",
            "   ▶ 标签加工（09:00）  [📄 标签加工 纪要]",
            "",
            "      □ ads_tag_result",
            "         • 新增字段",
            "         • 会后同步给业务方",
            "",
            "2. 【其他】",
            "",
            "   ▶ 午餐（12:00）",
            "",
            "      • 完成相关讨论和工作",
            "",
            &rule,
            "二、问题与风险",
            &rule,
            "",
            "今日暂无重大问题或风险。",
            "",
            "⚠ 需关注事项：",
            "   • 数据加工进度",
            "   • 数据质量验证",
            "",
            &rule,
            "三、明日工作计划",
            &rule,
            "",
            "1. 完成当前版本指标结果表SQL确认",
            "2. 确认相关数据问题处理进度",
            "",
            &rule,
            "日报生成时间：2026/3/2 18:30:00  |  AI自动生成",
        ]
        .join("\n");

        assert_eq!(PlainTextRenderer.render(&report), expected);
    }

    #[test]
    fn test_weekly_plain_plan_is_grouped_by_category() {
        let at = tz().with_ymd_and_hms(2026, 3, 6, 17, 0, 0).unwrap();
        let report = ReportCompiler::new(ReportPeriod::Weekly, at)
            .compile(vec![CompileInput::bare(Event::new("上链评审", at))]);
        let out = PlainTextRenderer.render(&report);
        assert!(out.starts_with("本周工作周报（2026-03-06）\n"));
        assert!(out.contains("   ▶ 上链评审（3月6日）\n"));
        assert!(out.contains("三、下周工作计划"));
        assert!(out.contains("1. 【上链】\n   1. 继续完善相关工作\n   2. 按计划推进\n"));
        assert!(out.ends_with("周报生成时间：2026/3/6 17:00:00  |  AI自动生成"));
    }
}
