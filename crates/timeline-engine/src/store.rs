//! Explicit, serializable timeline state with pure update functions.
//!
//! The store replaces ambient UI state: a host keeps a [`TimelineStore`] value,
//! passes it to [`apply`] together with an [`Action`], and gets the next store
//! back. The input store is never mutated. Drag sessions are not
//! part of the store; they live in a [`DragController`](crate::drag::DragController)
//! and reach the store only as [`Action::ApplyDrag`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TimelineConfig;
use crate::date::Instant;
use crate::drag::DragUpdate;
use crate::error::{Result, TimelineError};
use crate::model::{Interval, IntervalId, Milestone, Resource, Window};
use crate::ticks::Granularity;
use crate::view::{render, RenderInput, TimelineView};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStore {
    #[serde(default)]
    pub intervals: Vec<Interval>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub window: Window,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub config: TimelineConfig,
}

/// A state transition requested by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetWindow { start: Instant, end: Instant },
    /// Shift the window by whole days (negative scrolls back).
    ScrollWindow { days: i64 },
    SetGranularity { granularity: Granularity },
    /// Insert, or replace the interval with the same id.
    UpsertInterval { interval: Interval },
    /// Remove an interval. Unknown ids are ignored. A host with an active drag on
    /// this interval must cancel it (see `DragController::cancel_if_dragging`).
    RemoveInterval { id: IntervalId },
    /// Write a drag preview, commit or cancel back into the interval.
    ApplyDrag { update: DragUpdate },
}

impl TimelineStore {
    pub fn new(window: Window, granularity: Granularity) -> Self {
        Self {
            intervals: Vec::new(),
            resources: Vec::new(),
            milestones: Vec::new(),
            window,
            granularity,
            config: TimelineConfig::default(),
        }
    }

    pub fn interval(&self, id: &IntervalId) -> Option<&Interval> {
        self.intervals.iter().find(|i| &i.id == id)
    }

    /// Render the current state.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidConfig` if the stored config does not validate.
    pub fn render(&self) -> Result<TimelineView> {
        render(&RenderInput {
            intervals: &self.intervals,
            milestones: &self.milestones,
            window: &self.window,
            granularity: self.granularity,
            config: &self.config,
        })
    }
}

/// Compute the store that results from applying `action` to `store`.
///
/// # Errors
/// - `TimelineError::InvalidWindow` for `SetWindow` with `end < start`.
/// - `TimelineError::InvalidDate` for `ScrollWindow` past the representable date range.
/// - `TimelineError::UnknownInterval` for `ApplyDrag` on an interval that no longer exists.
pub fn apply(store: &TimelineStore, action: Action) -> Result<TimelineStore> {
    let mut next = store.clone();

    match action {
        Action::SetWindow { start, end } => {
            next.window = Window::new(start, end)?;
        }
        Action::ScrollWindow { days } => {
            next.window = store.window.shifted(days)?;
        }
        Action::SetGranularity { granularity } => {
            next.granularity = granularity;
        }
        Action::UpsertInterval { interval } => {
            match next.intervals.iter_mut().find(|i| i.id == interval.id) {
                Some(existing) => *existing = interval,
                None => next.intervals.push(interval),
            }
        }
        Action::RemoveInterval { id } => {
            next.intervals.retain(|i| i.id != id);
        }
        Action::ApplyDrag { update } => {
            let interval = next
                .intervals
                .iter_mut()
                .find(|i| i.id == update.interval_id)
                .ok_or_else(|| TimelineError::UnknownInterval(update.interval_id.to_string()))?;
            interval.start = update.start;
            interval.end = update.end;
            debug!(
                interval = %update.interval_id,
                phase = ?update.phase,
                start = %update.start,
                end = %update.end,
                "applied drag update"
            );
        }
    }

    Ok(next)
}
