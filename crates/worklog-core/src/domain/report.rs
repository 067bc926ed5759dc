//! Compiled report model: sections, items, category groups.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::event::Event;

/// Placeholder item used when an event has no usable meeting notes.
pub const GENERIC_COMPLETION: &str = "完成相关讨论和工作";

/// Reporting period; selects the query window, time labels and template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Daily,
    Weekly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(ReportPeriod::Daily),
            "weekly" | "week" => Ok(ReportPeriod::Weekly),
            other => Err(format!("unknown report period: {other}")),
        }
    }
}

/// A titled or untitled group of items extracted from one meeting note.
///
/// # Invariants
///
/// Sections produced by the segmenter always carry at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSection {
    pub title: Option<String>,
    pub items: Vec<String>,
}

impl NoteSection {
    pub fn untitled(items: Vec<String>) -> Self {
        Self { title: None, items }
    }

    pub fn titled(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            items,
        }
    }

    /// The single section substituted when a note yields nothing.
    pub fn placeholder() -> Self {
        Self::untitled(vec![GENERIC_COMPLETION.to_string()])
    }
}

/// Per-event unit of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportItem {
    pub event: Event,
    pub sections: Vec<NoteSection>,
    pub linked_document_name: Option<String>,
}

/// All items of one category, in event processing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub items: Vec<ReportItem>,
}

/// A compiled report, ready to render.
///
/// `groups` is in first-seen category order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub report_date: NaiveDate,
    pub generated_at: DateTime<FixedOffset>,
    pub groups: Vec<CategoryGroup>,
}

impl Report {
    /// Categories in the order they will render.
    pub fn categories(&self) -> Vec<Category> {
        self.groups.iter().map(|g| g.category).collect()
    }

    /// Number of events across all groups.
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
