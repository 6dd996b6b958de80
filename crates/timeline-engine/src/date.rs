//! Canonical calendar dates and whole-day arithmetic.
//!
//! Every date held by the engine is an [`Instant`]: a calendar date pinned to
//! 12:00:00 UTC. Pinning to noon UTC means whole-day arithmetic never crosses a
//! DST boundary and two consecutive calendar days are always exactly
//! [`MILLIS_PER_DAY`] apart, regardless of the timezone the host process runs in.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TimelineError};

/// Length of one calendar day between two instants.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Hour of day (UTC) every instant is pinned to.
const CANONICAL_HOUR: i64 = 12;

/// A calendar date normalized to noon UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(DateTime<Utc>);

impl Instant {
    /// The canonical instant for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Instant(date.and_time(NaiveTime::default()).and_utc() + Duration::hours(CANONICAL_HOUR))
    }

    /// Build an instant from year, month (1-12) and day (1-31).
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidDate` when the triple is not a real calendar date
    /// (e.g. February 30th).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from_date)
            .ok_or_else(|| {
                TimelineError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
            })
    }

    /// The wall-clock calendar date of a zoned timestamp.
    ///
    /// `2026-03-08T23:30:00-08:00` becomes 2026-03-08 even though it is already
    /// March 9th in UTC.
    pub fn from_zoned<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self::from_date(dt.date_naive())
    }

    /// Today's calendar date in the given IANA timezone (e.g. "Europe/Berlin").
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidTimezone` if the name is not a valid IANA identifier.
    pub fn today_in(timezone: &str) -> Result<Self> {
        let tz: chrono_tz::Tz = timezone
            .parse()
            .map_err(|_| TimelineError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self::from_zoned(&Utc::now().with_timezone(&tz)))
    }

    pub fn date(self) -> NaiveDate {
        self.0.date_naive()
    }

    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    pub fn timestamp_millis(self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Shift by `n` whole days (negative `n` moves backwards).
    ///
    /// # Panics
    /// Panics if the result falls outside chrono's representable date range,
    /// like chrono's own `DateTime + Duration` arithmetic.
    pub fn add_days(self, n: i64) -> Self {
        Instant(self.0 + Duration::days(n))
    }

    /// Shift by `n` whole days, or `None` when the result is out of range.
    pub fn checked_add_days(self, n: i64) -> Option<Self> {
        Duration::try_days(n)
            .and_then(|d| self.0.checked_add_signed(d))
            .map(Instant)
    }

    /// Number of whole days from `self` to `other` (negative if `other` is earlier).
    pub fn days_until(self, other: Instant) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Position of this date within a week that begins on `week_start`
    /// (0 = `week_start`, 6 = the day before it).
    pub fn day_of_week(self, week_start: Weekday) -> u32 {
        let day = self.weekday().num_days_from_sunday();
        let anchor = week_start.num_days_from_sunday();
        (day + 7 - anchor) % 7
    }

    /// The most recent week start on or before this date, or the first
    /// representable day when that week start lies before chrono's range.
    pub fn week_start_on_or_before(self, week_start: Weekday) -> Self {
        self.checked_add_days(-i64::from(self.day_of_week(week_start)))
            .unwrap_or_else(Self::earliest)
    }

    /// The first representable calendar day.
    pub fn earliest() -> Self {
        Self::from_date(NaiveDate::MIN)
    }

    /// The 1st of this date's month.
    pub fn first_of_month(self) -> Self {
        self.with_day_one(self.month())
    }

    /// The 1st day of the calendar quarter containing this date.
    pub fn first_of_quarter(self) -> Self {
        self.with_day_one((self.month() - 1) / 3 * 3 + 1)
    }

    /// January 1st of this date's year.
    pub fn first_of_year(self) -> Self {
        self.with_day_one(1)
    }

    /// The 1st of the month `n` months after this date's month, or `None` when
    /// the result is out of chrono's range.
    pub fn add_months(self, n: i32) -> Option<Self> {
        let first = self.first_of_month().date();
        let months = Months::new(n.unsigned_abs());
        let shifted = if n >= 0 {
            first.checked_add_months(months)
        } else {
            first.checked_sub_months(months)
        };
        shifted.map(Self::from_date)
    }

    fn with_day_one(self, month: u32) -> Self {
        match NaiveDate::from_ymd_opt(self.year(), month, 1) {
            Some(date) => Self::from_date(date),
            // Day 1 exists in every month of every representable year.
            None => self,
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Instant {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s)
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        normalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a calendar date into its canonical [`Instant`].
///
/// Accepts `YYYY-MM-DD` (month and day may be unpadded), `YYYY/MM/DD`, and
/// timestamps in RFC 3339 or `YYYY-MM-DDTHH:MM:SS` form. Timestamps contribute
/// only their calendar date as written; no timezone shifting is applied.
///
/// # Errors
/// Returns `TimelineError::InvalidDate` if the text is not a valid calendar date.
pub fn normalize(input: &str) -> Result<Instant> {
    let s = input.trim();
    if s.is_empty() {
        return Err(TimelineError::InvalidDate("empty date".to_string()));
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Instant::from_date(date));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Instant::from_date(dt.date_naive()));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| Instant::from_date(ndt.date()))
        .map_err(|_| TimelineError::InvalidDate(s.to_string()))
}

/// Zero-padded `YYYY-MM-DD` text for an instant. Inverse of [`normalize`].
pub fn format(instant: Instant) -> String {
    instant.to_string()
}

/// `instant` shifted by `n` whole days.
pub fn add_days(instant: Instant, n: i64) -> Instant {
    instant.add_days(n)
}

/// Whole days from `a` to `b`; `day_delta(a, add_days(a, n)) == n`.
pub fn day_delta(a: Instant, b: Instant) -> i64 {
    a.days_until(b)
}

/// Day of week where 0 is `week_start`.
pub fn day_of_week(instant: Instant, week_start: Weekday) -> u32 {
    instant.day_of_week(week_start)
}

/// Parse a weekday name ("sunday", "Mon", ...) used as a week-start anchor.
///
/// # Errors
/// Returns `TimelineError::InvalidWeekStart` for anything chrono does not recognize.
pub fn parse_week_start(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| TimelineError::InvalidWeekStart(s.to_string()))
}

/// The result of parsing a comma-separated multi-date field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateList {
    /// Successfully parsed dates, in field order.
    pub dates: Vec<Instant>,
    /// Non-empty fragments that were not valid dates.
    pub rejected: Vec<String>,
}

/// Parse a comma-separated list of dates such as `"2025-01-05, 2025-02-10"`.
///
/// Malformed entries are skipped and reported in [`DateList::rejected`];
/// empty fragments (e.g. a trailing comma) are ignored entirely.
pub fn parse_date_list(field: &str) -> DateList {
    let mut list = DateList::default();
    for part in field.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        match normalize(trimmed) {
            Ok(instant) => list.dates.push(instant),
            Err(_) => list.rejected.push(trimmed.to_string()),
        }
    }
    list
}
