//! Time windows used to scope aggregation
//!
//! `TimeRange` is the user-facing selector; `Window` is the concrete inclusive
//! `[start, end]` interval it resolves to at a given instant. Calendar helpers
//! here are total: none of them can fail for in-range dates.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable aggregation range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// The current calendar day
    Today,
    /// Rolling 7 days
    Week,
    /// Rolling 1 month
    #[default]
    Month,
    /// Rolling 3 months
    Quarter,
    /// Rolling 12 months
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Today,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// The window this range covers at `now`
    ///
    /// `Today` is bounded by the calendar day; the others are rolling windows
    /// ending at `now`.
    pub fn window(&self, now: DateTime<Utc>) -> Window {
        match self {
            Self::Today => Window::day(now.date_naive()),
            Self::Week => Window::new(now - Duration::days(7), now),
            Self::Month => Window::new(sub_months(now, 1), now),
            Self::Quarter => Window::new(sub_months(now, 3), now),
            Self::Year => Window::new(sub_months(now, 12), now),
        }
    }

    /// The window of matching length immediately before `window(now)`
    ///
    /// It ends one nanosecond before the current window starts so the two
    /// never share a transaction.
    pub fn previous_window(&self, now: DateTime<Utc>) -> Window {
        let current = self.window(now);
        let end = current.start - Duration::nanoseconds(1);
        let start = match self {
            Self::Today => current.start - Duration::days(1),
            Self::Week => current.start - Duration::days(7),
            Self::Month => sub_months(current.start, 1),
            Self::Quarter => sub_months(current.start, 3),
            Self::Year => sub_months(current.start, 12),
        };
        Window::new(start, end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "Unknown time range '{}'. Use today, week, month, quarter or year",
                other
            )),
        }
    }
}

/// An inclusive `[start, end]` interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A whole calendar day
    pub fn day(date: NaiveDate) -> Self {
        let start = start_of_day(date);
        Self::new(start, start + Duration::days(1) - Duration::nanoseconds(1))
    }

    /// The whole calendar month starting at `month_start`
    pub fn month(month_start: NaiveDate) -> Self {
        let start = start_of_day(month_start);
        let end = start_of_day(next_month_start(month_start)) - Duration::nanoseconds(1);
        Self::new(start, end)
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

/// Midnight UTC on `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// First day of the month after the one containing `date`
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    // 31 days past the 1st always lands in the following month
    month_start(month_start(date) + Duration::days(31))
}

/// First day of the month before the one containing `date`
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    month_start(month_start(date) - Duration::days(1))
}

/// Calendar-aware month subtraction, clamping the day to the target month
fn sub_months(instant: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    instant
        .checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
