//! Domain types shared by every engine component.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date::Instant;
use crate::error::{Result, TimelineError};

/// Opaque identifier of an interval (work item).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(pub String);

/// Opaque identifier of a resource (person).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IntervalId {
    fn from(s: &str) -> Self {
        IntervalId(s.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId(s.to_string())
    }
}

/// A date-ranged work item assigned to zero or more resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub id: IntervalId,
    pub start: Instant,
    /// Inclusive: the interval covers the whole end day.
    pub end: Instant,
    #[serde(default)]
    pub resource_ids: BTreeSet<ResourceId>,
    /// Host-owned data (label, colour key, ...) carried through untouched.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Interval {
    pub fn new(id: impl Into<String>, start: Instant, end: Instant) -> Self {
        Self {
            id: IntervalId(id.into()),
            start,
            end,
            resource_ids: BTreeSet::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style helper to assign the interval to a resource.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource_ids.insert(ResourceId(resource.into()));
        self
    }

    /// `true` when the start is after the end (a soft, warn-only violation).
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days covered, counting both ends. Zero or negative
    /// for reversed intervals.
    pub fn span_days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }
}

/// An entity intervals are assigned to. Conflicts are computed per resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
}

/// The visible date range, both ends inclusive.
///
/// Constructed only through [`Window::new`], so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct Window {
    start: Instant,
    end: Instant,
}

#[derive(Deserialize)]
struct RawWindow {
    start: Instant,
    end: Instant,
}

impl TryFrom<RawWindow> for Window {
    type Error = TimelineError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Window::new(raw.start, raw.end)
    }
}

impl Window {
    /// # Errors
    /// Returns `TimelineError::InvalidWindow` when `end < start`.
    pub fn new(start: Instant, end: Instant) -> Result<Self> {
        if end < start {
            return Err(TimelineError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// Number of days shown, counting both ends (always >= 1).
    pub fn span_days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The same window shifted by `days` (used for scrolling).
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidDate` when either end would leave the
    /// representable date range.
    pub fn shifted(&self, days: i64) -> Result<Self> {
        match (self.start.checked_add_days(days), self.end.checked_add_days(days)) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(TimelineError::InvalidDate(format!(
                "window {}..{} shifted by {} days is out of range",
                self.start, self.end, days
            ))),
        }
    }
}

/// Marker shape for milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Diamond,
    Circle,
    Triangle,
    Square,
    Star,
    Flag,
}

/// Marker size for milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl MarkerSize {
    /// Rendering hint for the marker's diameter in pixels.
    pub fn diameter_px(self) -> f64 {
        match self {
            MarkerSize::Small => 8.0,
            MarkerSize::Medium => 12.0,
            MarkerSize::Large => 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default)]
    pub shape: MarkerShape,
    #[serde(default)]
    pub size: MarkerSize,
}

/// A point-in-time marker, possibly repeated on several dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub dates: Vec<Instant>,
    #[serde(default)]
    pub style: MarkerStyle,
}

/// Non-fatal problems surfaced to the host for user-facing warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The interval ends before it starts. It is kept and rendered with zero width.
    ReversedRange {
        interval_id: IntervalId,
        start: Instant,
        end: Instant,
    },
    /// A date field could not be parsed; the affected date point was dropped.
    InvalidDate {
        record_id: String,
        field: String,
        value: String,
    },
}
