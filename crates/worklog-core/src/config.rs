//! Report settings loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::domain::{Result, WorklogError};
use crate::retry::RetryPolicy;

pub const ENV_UTC_OFFSET_HOURS: &str = "WORKLOG_UTC_OFFSET_HOURS";
pub const ENV_RETRY_ATTEMPTS: &str = "WORKLOG_RETRY_ATTEMPTS";
pub const ENV_RETRY_DELAY_MS: &str = "WORKLOG_RETRY_DELAY_MS";
pub const ENV_HOLIDAYS_FILE: &str = "WORKLOG_HOLIDAYS_FILE";

/// Settings that shape a report run but carry no credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Local UTC offset used for windows, time labels and document dates.
    pub utc_offset_hours: i32,
    /// Retry policy for every remote call.
    pub retry: RetryPolicy,
    /// Optional JSON overlay for the holiday calendar.
    pub holidays_file: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8,
            retry: RetryPolicy::default(),
            holidays_file: None,
        }
    }
}

impl ReportSettings {
    /// Read settings from `WORKLOG_*` variables, falling back to defaults
    /// for unset ones. A set but unparseable value is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReportSettings::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_UTC_OFFSET_HOURS) {
            settings = settings.with_utc_offset_hours(parse_var(ENV_UTC_OFFSET_HOURS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_RETRY_ATTEMPTS) {
            settings.retry.max_attempts = parse_var(ENV_RETRY_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_DELAY_MS) {
            let delay_ms: u64 = parse_var(ENV_RETRY_DELAY_MS, &raw)?;
            settings.retry = RetryPolicy::fixed(
                settings.retry.max_attempts,
                Duration::from_millis(delay_ms),
            );
        }
        if let Some(raw) = lookup(ENV_HOLIDAYS_FILE) {
            if !raw.trim().is_empty() {
                settings.holidays_file = Some(PathBuf::from(raw.trim()));
            }
        }

        settings.offset()?;
        Ok(settings)
    }

    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_holidays_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.holidays_file = Some(path.into());
        self
    }

    /// The configured offset, validated to lie within ±23 hours.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                WorklogError::InvalidConfig(format!(
                    "{ENV_UTC_OFFSET_HOURS} out of range: {}",
                    self.utc_offset_hours
                ))
            })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| WorklogError::InvalidConfig(format!("{key}: cannot parse `{raw}`")))
}
