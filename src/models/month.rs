//! Calendar month representation
//!
//! A `Month` is a plain value: it knows its neighbours and the first and last
//! instants of its span in a given time zone. The planner uses it to widen its
//! query window one month at a time.

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EnvelopeError, EnvelopeResult};

/// A calendar month of a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, rejecting anything outside 1..=12
    pub fn new(year: i32, month: u32) -> EnvelopeResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EnvelopeError::Validation(format!("Invalid month: {}", month)));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EnvelopeError::Validation(format!("Invalid year: {}", year)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in the local time zone
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Get the preceding month
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First day of the month
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(if self.year < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
    }

    /// Last day of the month (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        let following = self.next().start_date();
        following.pred_opt().unwrap_or(following)
    }

    /// Whether `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Epoch millis of local midnight on the first day, in `tz`
    pub fn start_millis_in<Tz: TimeZone>(&self, tz: &Tz) -> i64 {
        local_to_millis(tz, self.start_date().and_time(NaiveTime::MIN))
    }

    /// Epoch millis of the last instant of the last day, in `tz`
    pub fn end_millis_in<Tz: TimeZone>(&self, tz: &Tz) -> i64 {
        let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or(NaiveTime::MIN);
        local_to_millis(tz, self.end_date().and_time(end_of_day))
    }

    /// [`Month::start_millis_in`] for the local time zone
    pub fn start_millis(&self) -> i64 {
        self.start_millis_in(&Local)
    }

    /// [`Month::end_millis_in`] for the local time zone
    pub fn end_millis(&self) -> i64 {
        self.end_millis_in(&Local)
    }

    /// Parse a month string of the form "YYYY-MM"
    pub fn parse(s: &str) -> EnvelopeResult<Self> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| EnvelopeError::Validation(format!("Invalid month format: {}", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| EnvelopeError::Validation(format!("Invalid month format: {}", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| EnvelopeError::Validation(format!("Invalid month format: {}", s)))?;
        Self::new(year, month)
    }
}

/// Resolve a local wall-clock time to epoch millis.
///
/// Ambiguous times take the earlier offset; times inside a DST gap move
/// forward past the gap.
fn local_to_millis<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> i64 {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(t) => t.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|t: DateTime<Tz>| t.timestamp_millis())
            .unwrap_or_else(|| tz.from_utc_datetime(&local).timestamp_millis()),
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
