use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use thiserror::Error;

/// Date formats accepted when a week is given as a calendar date
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Timestamp formats whose date part is accepted, time ignored
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Error returned when a string cannot be read as a calendar date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWeekError {
    #[error("Empty date string")]
    EmptyInput,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// An ISO week encoded as `year * 100 + week`, e.g. `202410`
///
/// This is the key every plan detail is bucketed by. Numbers convert
/// unchanged and calendar dates convert to the ISO week they fall in,
/// so any API taking `impl Into<PlanWeek>` accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanWeek(i32);

impl PlanWeek {
    /// Builds a week from an ISO year and week number, rejecting weeks the
    /// year does not have
    pub fn from_iso(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(Self::from)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// ISO year of the week
    pub fn cwyear(self) -> i32 {
        self.0 / 100
    }

    /// ISO week number within `cwyear`
    pub fn cweek(self) -> u32 {
        (self.0 % 100).unsigned_abs()
    }

    /// Monday of the week, or `None` if the encoding is not a real ISO week
    pub fn start_date(self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.cwyear(), self.cweek(), Weekday::Mon)
    }
}

impl From<i32> for PlanWeek {
    fn from(week: i32) -> Self {
        Self(week)
    }
}

impl From<PlanWeek> for i32 {
    fn from(week: PlanWeek) -> Self {
        week.0
    }
}

impl From<NaiveDate> for PlanWeek {
    fn from(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self(iso.year() * 100 + iso.week() as i32)
    }
}

impl From<&NaiveDate> for PlanWeek {
    fn from(date: &NaiveDate) -> Self {
        Self::from(*date)
    }
}

impl FromStr for PlanWeek {
    type Err = ParseWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s).map(Self::from)
    }
}

impl Display for PlanWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{:02}", self.cwyear(), self.cweek())
    }
}

/// Parses a calendar date: `YYYY-MM-DD`, `YYYY/MM/DD`, compact `YYYYMMDD`,
/// or a timestamp, of which only the date is kept
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseWeekError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseWeekError::EmptyInput);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| parse_compact_date(s))
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .map(|datetime| datetime.date())
        })
        // Date as written, not shifted to UTC
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| ParseWeekError::InvalidDate(s.to_owned()))
}

/// `YYYYMMDD`
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = s[..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
