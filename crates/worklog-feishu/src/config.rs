//! Feishu client configuration

use serde::{Deserialize, Serialize};
use worklog_core::ReportPeriod;

use crate::error::{FeishuError, Result};

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";
pub const DEFAULT_DOC_BASE_URL: &str = "https://feishu.cn";

/// Feishu configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct FeishuConfig {
    /// Open API root, without trailing slash
    pub base_url: String,
    /// Web root used to build document links
    pub doc_base_url: String,
    /// User access token sent as a bearer token
    pub user_token: Option<String>,
    /// Calendar whose events are reported
    pub calendar_id: Option<String>,
    /// Drive folder receiving daily reports
    pub daily_folder: Option<String>,
    /// Drive folder receiving weekly reports
    pub weekly_folder: Option<String>,
    /// Drive folder searched for meeting notes; the drive root when unset
    pub notes_folder: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Default for FeishuConfig {
    fn default() -> Self {
        FeishuConfig {
            base_url: env_opt("FEISHU_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            doc_base_url: env_opt("FEISHU_DOC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DOC_BASE_URL.to_string()),
            user_token: env_opt("FEISHU_USER_TOKEN"),
            calendar_id: env_opt("FEISHU_CALENDAR_ID"),
            daily_folder: env_opt("FEISHU_DAILY_FOLDER"),
            weekly_folder: env_opt("FEISHU_WEEKLY_FOLDER"),
            notes_folder: env_opt("FEISHU_NOTES_FOLDER"),
        }
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for FeishuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeishuConfig")
            .field("base_url", &self.base_url)
            .field("doc_base_url", &self.doc_base_url)
            .field("user_token", &self.user_token.as_ref().map(|_| "<redacted>"))
            .field("calendar_id", &self.calendar_id)
            .field("daily_folder", &self.daily_folder)
            .field("weekly_folder", &self.weekly_folder)
            .field("notes_folder", &self.notes_folder)
            .finish()
    }
}

impl FeishuConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API root with nothing else set
    pub fn new(base_url: &str) -> Self {
        FeishuConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            doc_base_url: DEFAULT_DOC_BASE_URL.to_string(),
            user_token: None,
            calendar_id: None,
            daily_folder: None,
            weekly_folder: None,
            notes_folder: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.user_token = Some(token.to_string());
        self
    }

    pub fn with_calendar(mut self, calendar_id: &str) -> Self {
        self.calendar_id = Some(calendar_id.to_string());
        self
    }

    pub fn with_folders(mut self, daily: &str, weekly: &str) -> Self {
        self.daily_folder = Some(daily.to_string());
        self.weekly_folder = Some(weekly.to_string());
        self
    }

    pub fn with_notes_folder(mut self, folder: &str) -> Self {
        self.notes_folder = Some(folder.to_string());
        self
    }

    pub fn with_doc_base_url(mut self, url: &str) -> Self {
        self.doc_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn token(&self) -> Result<&str> {
        self.user_token
            .as_deref()
            .ok_or(FeishuError::NotConfigured("FEISHU_USER_TOKEN"))
    }

    pub(crate) fn calendar(&self) -> Result<&str> {
        self.calendar_id
            .as_deref()
            .ok_or(FeishuError::NotConfigured("FEISHU_CALENDAR_ID"))
    }

    /// Report folder of a period.
    pub(crate) fn report_folder(&self, period: ReportPeriod) -> Result<&str> {
        match period {
            ReportPeriod::Daily => self
                .daily_folder
                .as_deref()
                .ok_or(FeishuError::NotConfigured("FEISHU_DAILY_FOLDER")),
            ReportPeriod::Weekly => self
                .weekly_folder
                .as_deref()
                .ok_or(FeishuError::NotConfigured("FEISHU_WEEKLY_FOLDER")),
        }
    }

    /// Browser link of a docx document.
    pub fn document_url(&self, document_id: &str) -> String {
        format!("{}/docx/{}", self.doc_base_url, document_id)
    }
}
