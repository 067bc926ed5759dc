//! Wire types of the Feishu Open API endpoints used by the client.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FeishuError, Result};

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiResponse {
    /// Fail on a non-zero `code`, otherwise hand back `data` if present.
    pub fn into_result(self) -> Result<Option<serde_json::Value>> {
        if self.code != 0 {
            return Err(FeishuError::Api {
                code: self.code,
                msg: self.msg,
            });
        }
        Ok(self.data)
    }

    /// Like [`ApiResponse::into_result`] but `data` is required and typed.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        let data = self.into_result()?.ok_or(FeishuError::MissingField("data"))?;
        Ok(serde_json::from_value(data)?)
    }
}

/// One page of a listing.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "files")]
    pub items: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, alias = "next_page_token")]
    pub page_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub summary: Option<String>,
    pub start_time: EventTime,
}

/// Timed events carry `timestamp`; all-day events carry `date`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTime {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl EventTime {
    /// Start instant in `offset`. All-day events start at local midnight.
    pub fn resolve(&self, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
        if let Some(ts) = &self.timestamp {
            return parse_unix_seconds(ts, offset);
        }
        if let Some(date) = &self.date {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| FeishuError::InvalidTimestamp(date.clone()))?;
            return offset
                .from_local_datetime(&day.and_hms_opt(0, 0, 0).unwrap_or_default())
                .single()
                .ok_or_else(|| FeishuError::InvalidTimestamp(date.clone()));
        }
        Err(FeishuError::MissingField("start_time.timestamp"))
    }
}

/// Parse a unix-seconds string such as `"1772413200"`.
pub fn parse_unix_seconds(raw: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| FeishuError::InvalidTimestamp(raw.to_string()))?;
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| FeishuError::InvalidTimestamp(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Drive
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub token: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub created_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Docx
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatedDocument {
    pub document: DocumentMeta,
}

#[derive(Debug, Deserialize)]
pub struct DocumentMeta {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateDocumentRequest<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct AppendChildrenRequest<'a> {
    pub children: &'a [Block],
}

/// Inline text style; unset flags are omitted from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub elements: Vec<TextElement>,
}

impl TextBody {
    pub fn run(content: impl Into<String>, style: Option<TextStyle>) -> Self {
        TextBody {
            elements: vec![TextElement {
                text_run: Some(TextRun {
                    content: content.into(),
                    text_style: style,
                }),
            }],
        }
    }

    /// Concatenated run contents.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.text_run.as_ref())
            .map(|r| r.content.as_str())
            .collect()
    }
}

pub const BLOCK_TEXT: u16 = 2;
pub const BLOCK_HEADING1: u16 = 3;
pub const BLOCK_HEADING2: u16 = 4;
pub const BLOCK_HEADING3: u16 = 5;
pub const BLOCK_BULLET: u16 = 7;

/// A docx block, both as listed and as appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    pub block_type: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading1: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading2: Option<TextBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading3: Option<TextBody>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn test_envelope_error_code() {
        let resp: ApiResponse =
            serde_json::from_value(json!({"code": 1254002, "msg": "no permission"})).unwrap();
        assert!(matches!(
            resp.into_result(),
            Err(FeishuError::Api { code: 1254002, .. })
        ));
    }

    #[test]
    fn test_envelope_missing_data() {
        let resp: ApiResponse = serde_json::from_value(json!({"code": 0, "msg": "ok"})).unwrap();
        assert!(matches!(
            resp.into_data::<CreatedDocument>(),
            Err(FeishuError::MissingField("data"))
        ));
    }

    #[test]
    fn test_page_accepts_files_alias() {
        let page: Page<DriveFile> = serde_json::from_value(json!({
            "files": [{"token": "t1", "name": "周会", "type": "docx", "created_time": "1772413200"}],
            "has_more": false
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].kind, "docx");
    }

    #[test]
    fn test_event_time_resolution() {
        // 2026-03-02 09:00:00 +08:00
        let timed = EventTime {
            timestamp: Some("1772413200".to_string()),
            date: None,
        };
        assert_eq!(
            timed.resolve(cst()).unwrap(),
            cst().with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
        );

        let all_day = EventTime {
            timestamp: None,
            date: Some("2026-03-02".to_string()),
        };
        assert_eq!(
            all_day.resolve(cst()).unwrap(),
            cst().with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
        );

        assert!(matches!(
            EventTime::default().resolve(cst()),
            Err(FeishuError::MissingField(_))
        ));
        assert!(matches!(
            parse_unix_seconds("soon", cst()),
            Err(FeishuError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_block_wire_shape_omits_unset_fields() {
        let block = Block {
            block_type: BLOCK_TEXT,
            text: Some(TextBody::run(
                "标题",
                Some(TextStyle {
                    bold: true,
                    italic: false,
                    font_size: Some(16),
                }),
            )),
            ..Block::default()
        };
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "block_type": 2,
                "text": {"elements": [{"text_run": {
                    "content": "标题",
                    "text_style": {"bold": true, "font_size": 16}
                }}]}
            })
        );
    }
}
