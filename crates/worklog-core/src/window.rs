//! Calendar query windows derived from an explicit reference time.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::ReportPeriod;

/// Inclusive time range used to query calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ReportWindow {
    /// Window for `period` ending on the day of `reference`.
    ///
    /// * Daily: 00:00:00 through 23:59:59 of the reference day.
    /// * Weekly: Monday 00:00:00 of the reference week through 23:59:59 of
    ///   the reference day. Weeks start on Monday, so a Sunday reference
    ///   covers the full preceding six days.
    pub fn for_period(period: ReportPeriod, reference: DateTime<FixedOffset>) -> Self {
        let day = reference.date_naive();
        let first_day = match period {
            ReportPeriod::Daily => day,
            ReportPeriod::Weekly => {
                day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
            }
        };
        let offset = reference.timezone();
        Self {
            start: local_at(offset, first_day, NaiveTime::default()),
            end: local_at(offset, day, end_of_day()),
        }
    }

    /// Start as unix seconds, the form the calendar API expects.
    pub fn start_timestamp(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_timestamp(&self) -> i64 {
        self.end.timestamp()
    }

    pub fn contains(&self, t: DateTime<FixedOffset>) -> bool {
        self.start <= t && t <= self.end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

fn local_at(offset: FixedOffset, day: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    // A fixed offset has no gaps or folds, so the mapping is always single.
    offset.from_utc_datetime(&(day.and_time(time) - offset))
}
