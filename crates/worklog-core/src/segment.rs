//! Meeting-note segmentation.
//!
//! Splits the raw text of one meeting note into [`NoteSection`]s. Lines
//! naming a result or data table (`ads_report_result`, `dim_user_table`)
//! open a titled section; bullets and longer plain lines become items of
//! the section that is currently open.
//!
//! Segmentation never fails. Garbage input degrades to fewer sections,
//! possibly none; substituting a placeholder for an empty result is the
//! caller's job (see [`crate::compile`]).

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::NoteSection;

/// Marker phrase of template lines asking the author to insert content.
pub const INSERT_MARKER: &str = "插入相关";

/// Plain lines must be longer than this many UTF-16 code units to count as
/// items, so a non-BMP character such as an emoji counts twice.
const MIN_PLAIN_LINE_UNITS: usize = 3;

const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

fn table_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_]+_(?:result|table)").expect("table title pattern is valid")
    })
}

/// Whether a trimmed line is noise that never contributes to a section.
fn is_noise(line: &str) -> bool {
    line.is_empty() || line.starts_with('@') || line.contains(INSERT_MARKER)
}

/// Whether a trimmed line names a result/data table.
pub fn is_table_title(line: &str) -> bool {
    table_title_re().is_match(line)
}

fn strip_bullet(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(BULLET_GLYPHS)?;
    Some(rest.trim_start())
}

/// Segment raw note text into sections, in source order.
pub fn segment(raw: &str) -> Vec<NoteSection> {
    let mut sections = Vec::new();
    let mut current: Option<NoteSection> = None;

    for line in raw.lines().map(str::trim) {
        if is_noise(line) {
            continue;
        }

        if is_table_title(line) {
            if let Some(done) = current.take() {
                if !done.items.is_empty() {
                    sections.push(done);
                }
            }
            current = Some(NoteSection::titled(line, Vec::new()));
            continue;
        }

        let item = match strip_bullet(line) {
            Some(text) => text,
            None if line.encode_utf16().count() > MIN_PLAIN_LINE_UNITS => line,
            None => continue,
        };

        current
            .get_or_insert_with(|| NoteSection::untitled(Vec::new()))
            .items
            .push(item.to_string());
    }

    if let Some(done) = current {
        if !done.items.is_empty() {
            sections.push(done);
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(segment("").is_empty());
        assert!(segment("\n   \n\t\n").is_empty());
    }

    #[test]
    fn test_bullets_form_one_untitled_section() {
        let sections = segment("• 完成 A 开发\n• 完成 B 测试");
        assert_eq!(
            sections,
            vec![NoteSection::untitled(items(&["完成 A 开发", "完成 B 测试"]))]
        );
    }

    #[test]
    fn test_table_name_opens_titled_section() {
        let sections = segment("ads_report_result\n• 新增字段\n• 校验通过");
        assert_eq!(
            sections,
            vec![NoteSection::titled(
                "ads_report_result",
                items(&["新增字段", "校验通过"])
            )]
        );
    }

    #[test]
    fn test_mentions_and_insert_markers_are_dropped() {
        let sections = segment("@张三 请关注\n插入相关内容\n正常的一行描述文本");
        assert_eq!(
            sections,
            vec![NoteSection::untitled(items(&["正常的一行描述文本"]))]
        );
    }

    #[test]
    fn test_untitled_then_titled_sections_keep_order() {
        let raw = "\
会议确定了本周目标
dim_org_table
- 字段对齐
* 主键确认
ads_index_result
• 口径复核";
        let sections = segment(raw);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, None);
        assert_eq!(sections[0].items, items(&["会议确定了本周目标"]));
        assert_eq!(sections[1].title.as_deref(), Some("dim_org_table"));
        assert_eq!(sections[1].items, items(&["字段对齐", "主键确认"]));
        assert_eq!(sections[2].title.as_deref(), Some("ads_index_result"));
        assert_eq!(sections[2].items, items(&["口径复核"]));
    }

    #[test]
    fn test_empty_titled_section_is_discarded() {
        let sections = segment("tmp_a_table\nads_b_result\n• 已上线");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title.as_deref(), Some("ads_b_result"));
    }

    #[test]
    fn test_trailing_empty_titled_section_is_discarded() {
        let sections = segment("• 一项\nads_empty_result");
        assert_eq!(sections, vec![NoteSection::untitled(items(&["一项"]))]);
    }

    #[test]
    fn test_short_plain_lines_are_skipped() {
        // three characters or fewer is not an item, four is
        let sections = segment("好的\n收到了\n已经确认");
        assert_eq!(sections, vec![NoteSection::untitled(items(&["已经确认"]))]);
    }

    #[test]
    fn test_title_pattern_requires_letter_identifier_prefix() {
        assert!(is_table_title("ads_report_result"));
        assert!(is_table_title("dim_user_table 说明"));
        assert!(!is_table_title("_result"));
        assert!(!is_table_title("ads_v2_result"));
        assert!(!is_table_title("结果 ads_report_result"));
    }

    #[test]
    fn test_bullet_glyph_and_following_whitespace_stripped() {
        let sections = segment("-    缩进很多的条目\n*紧贴的条目\n-");
        assert_eq!(
            sections,
            vec![NoteSection::untitled(items(&["缩进很多的条目", "紧贴的条目", ""]))]
        );
    }

    #[test]
    fn test_bare_glyph_is_an_empty_item() {
        assert_eq!(segment("•"), vec![NoteSection::untitled(items(&[""]))]);
        assert_eq!(
            segment("ods_user_table\n- "),
            vec![NoteSection::titled("ods_user_table", items(&[""]))]
        );
    }

    #[test]
    fn test_plain_line_length_counts_utf16_units() {
        // two emoji are four UTF-16 units
        assert_eq!(segment("👍👍"), vec![NoteSection::untitled(items(&["👍👍"]))]);
        assert!(segment("👍").is_empty());
        assert!(segment("完成了").is_empty());
        assert_eq!(segment("完成了吗"), vec![NoteSection::untitled(items(&["完成了吗"]))]);
    }

    #[test]
    fn test_garbage_input_never_panics() {
        let raw = "\u{0}\u{1}\n@@@\n####\n——————\n\r\n";
        let sections = segment(raw);
        assert!(sections.iter().all(|s| !s.items.is_empty()));
    }
}
