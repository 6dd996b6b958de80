//! Date → screen geometry.
//!
//! Positions are linear in whole days from the window start. Widths treat the
//! end date as inclusive, so a single-day interval is exactly one day wide.
//! Two scales are supported: a fixed number of pixels per day, and a
//! percentage mode that fits the whole window into `0.0..=100.0`.

use serde::{Deserialize, Serialize};

use crate::date::{day_delta, Instant};
use crate::error::{Result, TimelineError};
use crate::model::{Interval, IntervalId, MarkerStyle, Milestone, Window};

/// How dates map to horizontal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// A fixed zoom factor in pixels per day.
    PxPerDay(f64),
    /// Coordinates are percentages of the window's total inclusive span.
    Percent,
}

impl Default for Scale {
    fn default() -> Self {
        Scale::PxPerDay(30.0)
    }
}

impl Scale {
    /// Width of one day under this scale.
    pub fn px_per_day(self, window: &Window) -> f64 {
        match self {
            Scale::PxPerDay(px) => px,
            Scale::Percent => 100.0 / window.span_days() as f64,
        }
    }

    /// Horizontal offset of `instant` from the window start.
    pub fn x(self, instant: Instant, window: &Window) -> f64 {
        match self {
            Scale::PxPerDay(px) => x_from_date(instant, window.start(), px),
            Scale::Percent => percent_from_date(instant, window),
        }
    }

    /// Width of the inclusive range `start..=end`, floored at zero.
    pub fn width(self, start: Instant, end: Instant, window: &Window) -> f64 {
        match self {
            Scale::PxPerDay(px) => width_from_range(start, end, px),
            Scale::Percent => percent_width_from_range(start, end, window),
        }
    }

    /// Total width of the window.
    pub fn extent(self, window: &Window) -> f64 {
        self.width(window.start(), window.end(), window)
    }

    /// # Errors
    /// Returns `TimelineError::InvalidConfig` when `px_per_day` is not a positive
    /// finite number.
    pub fn validate(self) -> Result<()> {
        match self {
            Scale::PxPerDay(px) if !(px.is_finite() && px > 0.0) => Err(
                TimelineError::InvalidConfig(format!(
                    "px_per_day must be a positive number, got {}",
                    px
                )),
            ),
            _ => Ok(()),
        }
    }
}

/// Whether bars may extend past the window edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClampPolicy {
    /// Bars are cut to `[0, extent]`.
    Clamped,
    /// Bars keep their true position; the renderer handles overflow.
    #[default]
    Unclamped,
}

/// `day_delta(window_start, instant) * px_per_day`.
pub fn x_from_date(instant: Instant, window_start: Instant, px_per_day: f64) -> f64 {
    day_delta(window_start, instant) as f64 * px_per_day
}

/// `(day_delta(start, end) + 1) * px_per_day`, never negative.
pub fn width_from_range(start: Instant, end: Instant, px_per_day: f64) -> f64 {
    ((day_delta(start, end) + 1) as f64 * px_per_day).max(0.0)
}

/// Offset of `instant` from the window start as a percentage of the window span.
pub fn percent_from_date(instant: Instant, window: &Window) -> f64 {
    day_delta(window.start(), instant) as f64 * 100.0 / window.span_days() as f64
}

/// Width of `start..=end` as a percentage of the window span, never negative.
pub fn percent_width_from_range(start: Instant, end: Instant, window: &Window) -> f64 {
    ((day_delta(start, end) + 1) as f64 * 100.0 / window.span_days() as f64).max(0.0)
}

/// Clamp `value` into `[min, max]`.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Invert a pixel distance into whole days: `round(dx / px_per_day)`.
///
/// Returns 0 when the zoom factor is not a positive finite number.
pub fn day_delta_from_px(dx: f64, px_per_day: f64) -> i64 {
    if !(px_per_day.is_finite() && px_per_day > 0.0) || !dx.is_finite() {
        return 0;
    }
    (dx / px_per_day).round() as i64
}

/// The day under horizontal offset `x`, or `None` outside chrono's date range.
pub fn date_from_x(x: f64, window_start: Instant, px_per_day: f64) -> Option<Instant> {
    window_start.checked_add_days(day_delta_from_px(x, px_per_day))
}

/// Horizontal geometry of one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub interval_id: IntervalId,
    pub left: f64,
    pub width: f64,
    /// The interval ends before it starts; `width` is forced to zero.
    pub reversed: bool,
}

/// Compute the bar for one interval.
pub fn bar_geometry(
    interval: &Interval,
    window: &Window,
    scale: Scale,
    policy: ClampPolicy,
) -> Bar {
    let reversed = interval.is_reversed();
    let mut left = scale.x(interval.start, window);
    let mut width = if reversed {
        0.0
    } else {
        scale.width(interval.start, interval.end, window)
    };

    if policy == ClampPolicy::Clamped {
        let extent = scale.extent(window);
        let right = clamp(left + width, 0.0, extent);
        left = clamp(left, 0.0, extent);
        width = (right - left).max(0.0);
    }

    Bar {
        interval_id: interval.id.clone(),
        left,
        width,
        reversed,
    }
}

/// Compute bars for every interval, in input order.
pub fn layout_bars(
    intervals: &[Interval],
    window: &Window,
    scale: Scale,
    policy: ClampPolicy,
) -> Vec<Bar> {
    intervals
        .iter()
        .map(|interval| bar_geometry(interval, window, scale, policy))
        .collect()
}

/// Position of one milestone date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub milestone_id: String,
    pub instant: Instant,
    /// Centre of the marker, in the middle of its day cell.
    pub x: f64,
    pub diameter: f64,
    pub style: MarkerStyle,
}

/// Lay out every milestone date that falls inside the window.
pub fn layout_markers(milestones: &[Milestone], window: &Window, scale: Scale) -> Vec<Marker> {
    let half_day = scale.px_per_day(window) / 2.0;
    milestones
        .iter()
        .flat_map(|m| {
            m.dates
                .iter()
                .filter(|d| window.contains(**d))
                .map(move |d| Marker {
                    milestone_id: m.id.clone(),
                    instant: *d,
                    x: scale.x(*d, window) + half_day,
                    diameter: m.style.size.diameter_px(),
                    style: m.style,
                })
        })
        .collect()
}
