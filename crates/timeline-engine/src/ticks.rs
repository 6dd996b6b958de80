//! Axis tick generation for a visible window.
//!
//! Ticks are aligned to calendar boundaries of the chosen [`Granularity`]. The
//! first tick may precede the window start (the 1st of the window's month, the
//! week start on or before it, ...); it is emitted anyway and left to the
//! renderer to clip.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::Instant;
use crate::error::TimelineError;
use crate::model::Window;

/// Tick spacing unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// All granularities, finest first.
    pub const ALL: [Granularity; 5] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    /// Rendering hint for the width of one tick cell, in pixels.
    pub fn nominal_width(self) -> f64 {
        match self {
            Granularity::Day => 30.0,
            Granularity::Week => 80.0,
            Granularity::Month => 120.0,
            Granularity::Quarter => 160.0,
            Granularity::Year => 200.0,
        }
    }

    /// Approximate number of days between two ticks.
    pub fn approx_days(self) -> i64 {
        match self {
            Granularity::Day => 1,
            Granularity::Week => 7,
            Granularity::Month => 30,
            Granularity::Quarter => 91,
            Granularity::Year => 365,
        }
    }

    /// The finest granularity that yields at most `max_ticks` ticks over `window`,
    /// with week ticks anchored on `week_start`.
    ///
    /// Falls back to [`Granularity::Year`] when even yearly ticks exceed the target.
    pub fn suggest(window: &Window, max_ticks: usize, week_start: Weekday) -> Granularity {
        Self::ALL
            .into_iter()
            .find(|g| ticks(window, *g, week_start).count() <= max_ticks)
            .unwrap_or(Granularity::Year)
    }

    /// The aligned tick at or before `instant`.
    fn align(self, instant: Instant, week_start: Weekday) -> Instant {
        match self {
            Granularity::Day => instant,
            Granularity::Week => instant.week_start_on_or_before(week_start),
            Granularity::Month => instant.first_of_month(),
            Granularity::Quarter => instant.first_of_quarter(),
            Granularity::Year => instant.first_of_year(),
        }
    }

    /// The tick after `instant`, or `None` past chrono's date range.
    fn step(self, instant: Instant) -> Option<Instant> {
        match self {
            Granularity::Day => instant.checked_add_days(1),
            Granularity::Week => instant.checked_add_days(7),
            Granularity::Month => instant.add_months(1),
            Granularity::Quarter => instant.add_months(3),
            Granularity::Year => instant.add_months(12),
        }
    }

    /// Human label for a tick at `instant`.
    pub fn label(self, instant: Instant) -> String {
        let dt = instant.as_datetime();
        match self {
            Granularity::Day | Granularity::Week => dt.format("%b %-d").to_string(),
            Granularity::Month => dt.format("%b %Y").to_string(),
            Granularity::Quarter => format!(
                "Q{} '{:02}",
                (instant.month() - 1) / 3 + 1,
                instant.year().rem_euclid(100)
            ),
            Granularity::Year => instant.year().to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for Granularity {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Granularity::Day),
            "week" | "weeks" => Ok(Granularity::Week),
            "month" | "months" => Ok(Granularity::Month),
            "quarter" | "quarters" => Ok(Granularity::Quarter),
            "year" | "years" => Ok(Granularity::Year),
            _ => Err(TimelineError::InvalidGranularity(s.to_string())),
        }
    }
}

/// One grid line on the timeline axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub instant: Instant,
    pub label: String,
    /// Rendering hint only, not a layout constraint.
    pub nominal_width: f64,
}

/// Lazy, finite iterator over the ticks of a window. Created by [`ticks`].
#[derive(Debug, Clone)]
pub struct Ticks {
    next: Option<Instant>,
    end: Instant,
    granularity: Granularity,
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let instant = self.next.filter(|i| *i <= self.end)?;
        self.next = self.granularity.step(instant);
        Some(Tick {
            instant,
            label: self.granularity.label(instant),
            nominal_width: self.granularity.nominal_width(),
        })
    }
}

/// Iterate the ticks of `window` at `granularity`.
///
/// The first tick is `window.start()` aligned down to the granularity (week
/// ticks align to `week_start`); ticks continue while they are on or before
/// `window.end()`.
pub fn ticks(window: &Window, granularity: Granularity, week_start: Weekday) -> Ticks {
    Ticks {
        next: Some(granularity.align(window.start(), week_start)),
        end: window.end(),
        granularity,
    }
}

/// Generate the ordered tick sequence for `window` at `granularity`.
///
/// Pure: identical arguments always yield an identical sequence.
pub fn generate_ticks(
    window: &Window,
    granularity: Granularity,
    week_start: Weekday,
) -> Vec<Tick> {
    let result: Vec<Tick> = ticks(window, granularity, week_start).collect();
    debug!(
        %granularity,
        window_start = %window.start(),
        window_end = %window.end(),
        count = result.len(),
        "generated ticks"
    );
    result
}
