//! Report compilation: events plus note text in, grouped [`Report`] out.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::domain::{CategoryGroup, Event, NoteSection, Report, ReportItem, ReportPeriod};
use crate::segment::segment;

/// One event with whatever note content was found for it.
#[derive(Debug, Clone)]
pub struct CompileInput {
    pub event: Event,
    /// Name of the linked meeting-note document, if one was matched.
    pub linked_document_name: Option<String>,
    /// Raw note text; `None` when no document was linked or reading failed.
    pub note_text: Option<String>,
}

impl CompileInput {
    /// An event with no linked note.
    pub fn bare(event: Event) -> Self {
        Self {
            event,
            linked_document_name: None,
            note_text: None,
        }
    }

    pub fn with_note(mut self, document_name: impl Into<String>, text: Option<String>) -> Self {
        self.linked_document_name = Some(document_name.into());
        self.note_text = text;
        self
    }
}

/// Builds a [`Report`] for one period.
///
/// The generation timestamp is injected so that compiling and rendering are
/// deterministic.
#[derive(Debug, Clone)]
pub struct ReportCompiler {
    period: ReportPeriod,
    report_date: NaiveDate,
    generated_at: DateTime<FixedOffset>,
}

impl ReportCompiler {
    /// Report dated on the calendar day of `generated_at`.
    pub fn new(period: ReportPeriod, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            period,
            report_date: generated_at.date_naive(),
            generated_at,
        }
    }

    /// Override the date shown in the report heading and title.
    pub fn with_report_date(mut self, report_date: NaiveDate) -> Self {
        self.report_date = report_date;
        self
    }

    /// Compile a single event.
    ///
    /// Absent or unusable note text yields the placeholder section.
    pub fn compile_item(&self, input: CompileInput) -> ReportItem {
        let mut sections = input.note_text.as_deref().map(segment).unwrap_or_default();
        if sections.is_empty() {
            sections.push(NoteSection::placeholder());
        }
        debug!(
            title = input.event.title(),
            category = %input.event.category(),
            sections = sections.len(),
            "compiled report item"
        );
        ReportItem {
            event: input.event,
            sections,
            linked_document_name: input.linked_document_name,
        }
    }

    /// Compile all events, preserving their order, grouped by category.
    pub fn compile<I>(&self, inputs: I) -> Report
    where
        I: IntoIterator<Item = CompileInput>,
    {
        let items = inputs.into_iter().map(|i| self.compile_item(i)).collect();
        Report {
            period: self.period,
            report_date: self.report_date,
            generated_at: self.generated_at,
            groups: group_by_category(items),
        }
    }
}

/// Group items by category in first-seen order, keeping item order.
pub fn group_by_category(items: Vec<ReportItem>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in items {
        let category = item.event.category();
        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category,
                items: vec![item],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, GENERIC_COMPLETION};
    use chrono::TimeZone;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn event(title: &str, hour: u32) -> Event {
        Event::new(title, tz().with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap())
    }

    fn compiler() -> ReportCompiler {
        ReportCompiler::new(
            ReportPeriod::Daily,
            tz().with_ymd_and_hms(2026, 3, 2, 18, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_missing_note_gets_placeholder() {
        let item = compiler().compile_item(CompileInput::bare(event("指标开发", 9)));
        assert_eq!(item.sections, vec![NoteSection::placeholder()]);
        assert_eq!(item.sections[0].items[0], GENERIC_COMPLETION);
        assert!(item.linked_document_name.is_none());
    }

    #[test]
    fn test_linked_note_with_no_content_gets_placeholder() {
        let input = CompileInput::bare(event("指标开发", 9))
            .with_note("指标开发 纪要", Some("@李四\n插入相关文档".to_string()));
        let item = compiler().compile_item(input);
        assert_eq!(item.sections, vec![NoteSection::placeholder()]);
        assert_eq!(item.linked_document_name.as_deref(), Some("指标开发 纪要"));
    }

    #[test]
    fn test_note_text_is_segmented() {
        let input = CompileInput::bare(event("指标开发", 9))
            .with_note("纪要", Some("ads_x_result\n• 完成".to_string()));
        let item = compiler().compile_item(input);
        assert_eq!(item.sections.len(), 1);
        assert_eq!(item.sections[0].title.as_deref(), Some("ads_x_result"));
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let report = compiler().compile(vec![
            CompileInput::bare(event("数据质量核验", 9)),
            CompileInput::bare(event("标签加工", 10)),
            CompileInput::bare(event("校验规则复盘", 11)),
        ]);
        assert_eq!(
            report.categories(),
            vec![Category::DataQuality, Category::DataProcessing]
        );
        assert_eq!(report.groups[0].items.len(), 2);
        assert_eq!(report.groups[0].items[0].event.title(), "数据质量核验");
        assert_eq!(report.groups[0].items[1].event.title(), "校验规则复盘");
        assert_eq!(report.event_count(), 3);
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = compiler().compile(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.report_date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }
}
