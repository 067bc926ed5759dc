//! Conversion between rendered report text and docx blocks.

use worklog_core::render::styled::{H1, H2, H3, SUB};
use worklog_core::RenderStyle;

use crate::model::{
    Block, TextBody, TextStyle, BLOCK_BULLET, BLOCK_HEADING1, BLOCK_HEADING2, BLOCK_HEADING3,
    BLOCK_TEXT,
};

/// Children appended per request.
pub fn batch_size(style: RenderStyle) -> usize {
    match style {
        RenderStyle::Plain | RenderStyle::Markdown => 50,
        RenderStyle::Styled => 40,
    }
}

fn text(content: impl Into<String>, style: Option<TextStyle>) -> Block {
    Block {
        block_type: BLOCK_TEXT,
        text: Some(TextBody::run(content, style)),
        ..Block::default()
    }
}

fn bullet(content: impl Into<String>) -> Block {
    Block {
        block_type: BLOCK_BULLET,
        bullet: Some(TextBody::run(content, None)),
        ..Block::default()
    }
}

fn bold(font_size: Option<u8>) -> Option<TextStyle> {
    Some(TextStyle {
        bold: true,
        italic: false,
        font_size,
    })
}

/// Blocks for a rendered report, in document order.
pub fn blocks_for(rendered: &str, style: RenderStyle) -> Vec<Block> {
    match style {
        RenderStyle::Plain => rendered.lines().map(plain_block).collect(),
        RenderStyle::Markdown => rendered.lines().map(markdown_block).collect(),
        RenderStyle::Styled => rendered.lines().filter_map(styled_block).collect(),
    }
}

/// Every line verbatim as a text block; blank lines keep their spacing.
fn plain_block(line: &str) -> Block {
    if line.is_empty() {
        text(" ", None)
    } else {
        text(line, None)
    }
}

fn markdown_block(line: &str) -> Block {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return text(" ", None);
    }
    let heading = |level: &str| {
        trimmed
            .strip_prefix(level)
            .filter(|rest| rest.starts_with(char::is_whitespace))
            .map(str::trim_start)
    };
    if let Some(rest) = heading("#") {
        return Block {
            block_type: BLOCK_HEADING1,
            heading1: Some(TextBody::run(rest, None)),
            ..Block::default()
        };
    }
    if let Some(rest) = heading("##") {
        return Block {
            block_type: BLOCK_HEADING2,
            heading2: Some(TextBody::run(rest, None)),
            ..Block::default()
        };
    }
    if let Some(rest) = heading("###") {
        return Block {
            block_type: BLOCK_HEADING3,
            heading3: Some(TextBody::run(rest, None)),
            ..Block::default()
        };
    }
    let bulleted = trimmed
        .strip_prefix(['*', '-', '•'])
        .filter(|rest| rest.starts_with(char::is_whitespace));
    match bulleted {
        Some(rest) => bullet(rest.trim_start()),
        None => text(trimmed, None),
    }
}

/// Marker-tagged line to block; blank lines are dropped.
fn styled_block(line: &str) -> Option<Block> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let block = if let Some(rest) = line.strip_prefix(H1) {
        text(rest, bold(Some(16)))
    } else if let Some(rest) = line.strip_prefix(H2) {
        text(rest, bold(Some(14)))
    } else if let Some(rest) = line.strip_prefix(H3) {
        text(
            rest,
            Some(TextStyle {
                bold: true,
                italic: true,
                font_size: None,
            }),
        )
    } else if let Some(rest) = line.strip_prefix(SUB) {
        text(format!("    {rest}"), bold(None))
    } else if let Some(rest) = line.strip_prefix("- ") {
        bullet(rest)
    } else if let Some(rest) = line.strip_prefix("  - ") {
        text(format!("        • {rest}"), None)
    } else {
        text(trimmed, None)
    };
    Some(block)
}

/// Note text of a document, as the segmenter expects it.
///
/// Text blocks contribute their content and bullets a `• `-prefixed line.
/// Every other block kind (headings, tables, images, the page root)
/// contributes nothing.
pub fn extract_text(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        if let Some(body) = &block.text {
            out.push_str(&body.plain_text());
            out.push('\n');
        }
        if let Some(body) = &block.bullet {
            out.push_str("• ");
            out.push_str(&body.plain_text());
            out.push('\n');
        }
    }
    out
}
