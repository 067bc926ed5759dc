//! Public-holiday calendar for deciding whether a day is a workday.
//!
//! Ships with mainland-China data for 2024–2026, including make-up workdays
//! (调休) that fall on weekends. Further years can be overlaid from a JSON
//! file shaped like:
//!
//! ```json
//! { "2027": { "holidays": ["2027-01-01"], "workdays": ["2027-02-07"] } }
//! ```
//!
//! An overlaid year replaces the built-in data for that year wholesale.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Result, WorklogError};

/// Holidays and make-up workdays of one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCalendar {
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub workdays: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayCalendar {
    years: BTreeMap<i32, YearCalendar>,
}

type MonthDay = (u32, u32);

#[rustfmt::skip]
const BUILTIN: &[(i32, &[MonthDay], &[MonthDay])] = &[
    (
        2024,
        &[
            (1, 1),
            (2, 10), (2, 11), (2, 12), (2, 13), (2, 14), (2, 15), (2, 16), (2, 17),
            (4, 4), (4, 5), (4, 6),
            (5, 1), (5, 2), (5, 3), (5, 4), (5, 5),
            (6, 10),
            (9, 15), (9, 16), (9, 17),
            (10, 1), (10, 2), (10, 3), (10, 4), (10, 5), (10, 6), (10, 7),
        ],
        &[(2, 4), (2, 18), (4, 7), (4, 28), (5, 11), (9, 14), (9, 29), (10, 12)],
    ),
    (
        2025,
        &[
            (1, 1),
            (1, 28), (1, 29), (1, 30), (1, 31), (2, 1), (2, 2), (2, 3), (2, 4),
            (4, 4), (4, 5), (4, 6),
            (5, 1), (5, 2), (5, 3), (5, 4), (5, 5),
            (5, 31), (6, 1), (6, 2),
            (10, 1), (10, 2), (10, 3), (10, 4), (10, 5), (10, 6), (10, 7), (10, 8),
        ],
        &[(1, 26), (2, 8), (4, 27), (9, 28), (10, 11)],
    ),
    (
        2026,
        &[
            (1, 1),
            (2, 15), (2, 16), (2, 17), (2, 18), (2, 19), (2, 20), (2, 21), (2, 22), (2, 23),
            (4, 4), (4, 5), (4, 6),
            (5, 1), (5, 2), (5, 3), (5, 4), (5, 5),
            (6, 19), (6, 20), (6, 21),
            (9, 25), (9, 26), (9, 27),
            (10, 1), (10, 2), (10, 3), (10, 4), (10, 5), (10, 6), (10, 7),
        ],
        &[(2, 14), (2, 28), (5, 9), (9, 20), (10, 10)],
    ),
];

fn dates(year: i32, days: &[MonthDay]) -> BTreeSet<NaiveDate> {
    days.iter()
        .filter_map(|&(m, d)| NaiveDate::from_ymd_opt(year, m, d))
        .collect()
}

impl HolidayCalendar {
    /// A calendar with no holiday data: every Monday–Friday is a workday.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in 2024–2026 data.
    pub fn builtin() -> Self {
        let years = BUILTIN
            .iter()
            .map(|&(year, holidays, workdays)| {
                (
                    year,
                    YearCalendar {
                        holidays: dates(year, holidays),
                        workdays: dates(year, workdays),
                    },
                )
            })
            .collect();
        Self { years }
    }

    /// Parse overlay data from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let cal: HolidayCalendar = serde_json::from_str(json)
            .map_err(|e| WorklogError::InvalidHolidayData(e.to_string()))?;
        for (year, data) in &cal.years {
            let stray = data
                .holidays
                .iter()
                .chain(data.workdays.iter())
                .find(|d| d.year() != *year);
            if let Some(d) = stray {
                return Err(WorklogError::InvalidHolidayData(format!(
                    "date {d} listed under year {year}"
                )));
            }
        }
        Ok(cal)
    }

    /// Overlay `other` on top of `self`, year by year.
    pub fn merge(&mut self, other: HolidayCalendar) {
        self.years.extend(other.years);
    }

    /// Overlay the JSON file at `path` on top of `self`.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let overlay = Self::from_json(&text)?;
        debug!(path = %path.display(), years = overlay.years.len(), "loaded holiday overlay");
        self.merge(overlay);
        Ok(())
    }

    /// Built-in data, optionally overlaid from a file.
    pub fn load(overlay: Option<&Path>) -> Result<Self> {
        let mut cal = Self::builtin();
        if let Some(path) = overlay {
            cal.merge_file(path)?;
        }
        Ok(cal)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn year(&self, year: i32) -> Option<&YearCalendar> {
        self.years.get(&year)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.years
            .get(&date.year())
            .is_some_and(|y| y.holidays.contains(&date))
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        if let Some(y) = self.years.get(&date.year()) {
            if y.holidays.contains(&date) {
                return false;
            }
            if y.workdays.contains(&date) {
                return true;
            }
        }
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Holidays falling in the given month, in date order.
    pub fn month_holidays(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        self.years
            .get(&year)
            .map(|y| {
                y.holidays
                    .iter()
                    .filter(|d| d.month() == month)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}
