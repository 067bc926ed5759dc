//! Report rendering strategies.
//!
//! A [`Report`] renders to text through one of three interchangeable
//! [`ReportRenderer`]s, selected by [`RenderStyle`]:
//!
//! - `plain`: ruled plain-text layout, uploaded one line per text block
//! - `markdown`: `#`-headed Markdown
//! - `styled`: lines tagged `【H1】`/`【H2】`/`【H3】`/`【SUB】` that the Feishu
//!   client turns into bold/italic text blocks and bullet blocks
//!
//! Every strategy walks categories in first-seen order, items in event
//! order, then sections and their items, and appends the fixed boilerplate
//! from [`template::ReportTemplate`]. Rendering reads no clock and no
//! environment: the same report always renders to the same bytes.

pub mod markdown;
pub mod plain;
pub mod styled;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::domain::Report;

pub use markdown::MarkdownRenderer;
pub use plain::PlainTextRenderer;
pub use styled::StyledLinesRenderer;
pub use template::ReportTemplate;

/// A rendering strategy.
pub trait ReportRenderer {
    fn render(&self, report: &Report) -> String;
}

/// Selects a [`ReportRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    Plain,
    Markdown,
    Styled,
}

impl RenderStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStyle::Plain => "plain",
            RenderStyle::Markdown => "markdown",
            RenderStyle::Styled => "styled",
        }
    }

    pub fn renderer(&self) -> &'static dyn ReportRenderer {
        match self {
            RenderStyle::Plain => &PlainTextRenderer,
            RenderStyle::Markdown => &MarkdownRenderer,
            RenderStyle::Styled => &StyledLinesRenderer,
        }
    }
}

impl std::fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(RenderStyle::Plain),
            "markdown" | "md" => Ok(RenderStyle::Markdown),
            "styled" | "blocks" => Ok(RenderStyle::Styled),
            other => Err(format!(
                "unknown render style `{other}`; expected plain|markdown|styled"
            )),
        }
    }
}

/// Render `report` with the given style.
pub fn render(report: &Report, style: RenderStyle) -> String {
    style.renderer().render(report)
}
