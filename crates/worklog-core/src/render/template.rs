//! Fixed per-period wording and the boilerplate blocks of a report.
//!
//! Nothing here depends on report content except the weekly plan, which
//! repeats its steps once per report item of each category.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};

use crate::domain::{Category, Event, Report, ReportPeriod};

/// Tag appended to every generated footer.
pub const GENERATED_TAG: &str = "AI自动生成";

/// Heading of the risks section, shared by both periods.
pub const RISKS_HEADING: &str = "二、问题与风险";

/// How the plan section is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextSteps {
    /// The same list regardless of content.
    Fixed(&'static [&'static str]),
    /// Under each category, these steps once per item of that category.
    PerItem(&'static [&'static str]),
}

/// Per-period static text of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTemplate {
    pub title: &'static str,
    pub show_weekday: bool,
    pub progress_heading: &'static str,
    pub no_risk: &'static str,
    pub watch_items: &'static [&'static str],
    pub plan_heading: &'static str,
    pub next_steps: NextSteps,
    pub footer_label: &'static str,
    pub document_suffix: &'static str,
}

static DAILY: ReportTemplate = ReportTemplate {
    title: "工作日报",
    show_weekday: true,
    progress_heading: "一、今日工作进度",
    no_risk: "今日暂无重大问题或风险。",
    watch_items: &["数据加工进度", "数据质量验证"],
    plan_heading: "三、明日工作计划",
    next_steps: NextSteps::Fixed(&["完成当前版本指标结果表SQL确认", "确认相关数据问题处理进度"]),
    footer_label: "日报生成时间",
    document_suffix: "日报",
};

static WEEKLY: ReportTemplate = ReportTemplate {
    title: "本周工作周报",
    show_weekday: false,
    progress_heading: "一、本周工作进度",
    no_risk: "本周暂无重大问题或风险。",
    watch_items: &["需关注数据样例输出进度", "指标加工逻辑需持续验证"],
    plan_heading: "三、下周工作计划",
    next_steps: NextSteps::PerItem(&["继续完善相关工作", "按计划推进"]),
    footer_label: "周报生成时间",
    document_suffix: "周报",
};

/// Plan section resolved against a concrete report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanBlock {
    Fixed(Vec<&'static str>),
    PerCategory(Vec<(Category, Vec<&'static str>)>),
}

impl ReportTemplate {
    pub fn for_period(period: ReportPeriod) -> &'static ReportTemplate {
        match period {
            ReportPeriod::Daily => &DAILY,
            ReportPeriod::Weekly => &WEEKLY,
        }
    }

    /// `工作日报（2026-03-02 星期一）` / `本周工作周报（2026-03-06）`
    pub fn heading(&self, date: NaiveDate) -> String {
        if self.show_weekday {
            format!("{}（{} {}）", self.title, date_label(date), weekday_label(date))
        } else {
            format!("{}（{}）", self.title, date_label(date))
        }
    }

    /// Title of the uploaded document, e.g. `2026-03-02_日报`.
    pub fn document_title(&self, date: NaiveDate) -> String {
        format!("{}_{}", date_label(date), self.document_suffix)
    }

    pub fn plan(&self, report: &Report) -> PlanBlock {
        match self.next_steps {
            NextSteps::Fixed(steps) => PlanBlock::Fixed(steps.to_vec()),
            NextSteps::PerItem(steps) => PlanBlock::PerCategory(
                report
                    .groups
                    .iter()
                    .map(|g| {
                        let repeated = g
                            .items
                            .iter()
                            .flat_map(|_| steps.iter().copied())
                            .collect();
                        (g.category, repeated)
                    })
                    .collect(),
            ),
        }
    }

    /// Footer line content, e.g. `日报生成时间：2026/3/2 18:00:00`.
    pub fn footer(&self, generated_at: DateTime<FixedOffset>) -> String {
        format!("{}：{}", self.footer_label, timestamp_label(generated_at))
    }
}

/// `YYYY-MM-DD`
pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

/// `YYYY/M/D HH:MM:SS`
pub fn timestamp_label(t: DateTime<FixedOffset>) -> String {
    t.format("%Y/%-m/%-d %H:%M:%S").to_string()
}

/// When an event happened, as shown next to its title: `HH:MM` in daily
/// reports and `M月D日` in weekly ones.
pub fn when_label(period: ReportPeriod, event: &Event) -> String {
    let start = event.start_time();
    match period {
        ReportPeriod::Daily => start.format("%H:%M").to_string(),
        ReportPeriod::Weekly => format!("{}月{}日", start.month(), start.day()),
    }
}
