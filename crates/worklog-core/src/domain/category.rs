//! Task categories and the keyword classifier.
//!
//! A calendar event is assigned exactly one [`Category`] by scanning
//! [`Category::TABLE`] in order and returning the first category whose
//! keyword list contains a substring of the title.

use serde::{Deserialize, Serialize};

/// Task category derived from an event title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    DataProcessing,
    WarehouseDesign,
    DataQuality,
    ProductCatalog,
    Communication,
    DataSample,
    Training,
    OnChain,
    Operations,
    Other,
}

impl Category {
    /// Ordered keyword table.
    ///
    /// Order is significant at both levels. A title that matches keywords
    /// of two categories resolves to the earlier row: "产品质量会议" is
    /// `DataQuality`, not `ProductCatalog` or `Communication`. Nothing
    /// upstream documents this tie-break as intended; reordering rows
    /// changes existing report output.
    pub const TABLE: &'static [(Category, &'static [&'static str])] = &[
        (
            Category::DataProcessing,
            &["加工", "标签", "复刻", "指标", "指标表", "开发"],
        ),
        (
            Category::WarehouseDesign,
            &["数仓", "模型", "星型", "DWT", "DWS", "设计"],
        ),
        (Category::DataQuality, &["质量", "核验", "校验", "问题"]),
        (Category::ProductCatalog, &["产品库", "产品"]),
        (
            Category::Communication,
            &["沟通", "研讨", "讨论", "对齐", "会议"],
        ),
        (Category::DataSample, &["样例", "数据样例", "样本"]),
        (Category::Training, &["培训"]),
        (Category::OnChain, &["上链"]),
        (Category::Operations, &["运维"]),
    ];

    /// Display label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::DataProcessing => "数据加工",
            Category::WarehouseDesign => "数仓设计",
            Category::DataQuality => "数据质量",
            Category::ProductCatalog => "产品库",
            Category::Communication => "会议沟通",
            Category::DataSample => "数据样例",
            Category::Training => "培训",
            Category::OnChain => "上链",
            Category::Operations => "运维",
            Category::Other => "其他",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an event title.
///
/// Matching is a case-sensitive substring test with no tokenization.
/// `None`, an empty title and a title with no configured keyword all
/// yield [`Category::Other`].
pub fn classify(title: Option<&str>) -> Category {
    let title = match title {
        Some(t) if !t.is_empty() => t,
        _ => return Category::Other,
    };

    for (category, keywords) in Category::TABLE {
        if keywords.iter().any(|kw| title.contains(kw)) {
            return *category;
        }
    }
    Category::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_missing_titles_are_other() {
        assert_eq!(classify(None), Category::Other);
        assert_eq!(classify(Some("")), Category::Other);
    }

    #[test]
    fn test_unmatched_title_is_other() {
        assert_eq!(classify(Some("午餐")), Category::Other);
        assert_eq!(classify(Some("(无标题)")), Category::Other);
    }

    #[test]
    fn test_each_keyword_classifies_to_its_row() {
        for (category, keywords) in Category::TABLE {
            for &kw in *keywords {
                assert_eq!(classify(Some(kw)), *category, "keyword {kw}");
                let title = format!("周一{kw}安排");
                assert_eq!(classify(Some(&title)), *category, "title {title}");
            }
        }
    }

    #[test]
    fn test_warehouse_design_title() {
        assert_eq!(
            classify(Some("数仓模型设计评审")),
            Category::WarehouseDesign
        );
    }

    #[test]
    fn test_earlier_row_wins_on_ambiguity() {
        // "指标" (DataProcessing) beats "会议" (Communication)
        assert_eq!(classify(Some("指标口径会议")), Category::DataProcessing);
        // "质量" (DataQuality) beats "产品" and "会议"
        assert_eq!(classify(Some("产品质量会议")), Category::DataQuality);
        // "设计" (WarehouseDesign) beats "讨论"
        assert_eq!(classify(Some("方案设计讨论")), Category::WarehouseDesign);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify(Some("DWS 分层")), Category::WarehouseDesign);
        assert_eq!(classify(Some("dws 分层")), Category::Other);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::DataProcessing.to_string(), "数据加工");
        assert_eq!(Category::Communication.label(), "会议沟通");
        assert_eq!(Category::Other.label(), "其他");
    }
}
