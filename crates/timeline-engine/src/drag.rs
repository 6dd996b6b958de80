//! Pointer-driven move/resize of a single interval.
//!
//! [`DragController`] is a three-state machine: `Idle → Dragging(mode) → Idle`.
//! A host (canvas, native GUI, terminal) starts a session with [`DragController::begin`]
//! on pointer-down and then feeds [`PointerEvent`]s whose `dx`/`dy` are offsets from
//! the pointer-down position. Every move produces a [`DragUpdate`] computed from
//! the interval's *original* start and end, so rounding never accumulates across
//! frames.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::date::{day_delta, Instant};
use crate::error::{Result, TimelineError};
use crate::geometry::{clamp, day_delta_from_px};
use crate::model::{Interval, IntervalId, Window};

/// Largest day shift a single drag can apply, keeping date arithmetic in range.
const MAX_DRAG_DAYS: i64 = 1_000_000;

/// What part of the interval is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    /// Pointer-down on the bar body: start and end shift together.
    Move,
    /// Pointer-down on the leading edge handle.
    ResizeStart,
    /// Pointer-down on the trailing edge handle.
    ResizeEnd,
}

/// Host-neutral pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Pointer moved; offsets are relative to the pointer-down position.
    Move { dx: f64, dy: f64 },
    /// Pointer released: commit.
    Release,
    /// Drag aborted (Escape key, interval deleted, ...): revert.
    Cancel,
}

/// Per-session drag parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragOptions {
    pub px_per_day: f64,
    /// Preview offsets snap to whole days instead of following the pointer.
    pub snap: bool,
    /// When set, the interval is kept inside these bounds (clamped mode).
    pub bounds: Option<Window>,
}

impl DragOptions {
    pub fn new(px_per_day: f64) -> Self {
        Self {
            px_per_day,
            snap: true,
            bounds: None,
        }
    }

    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap = snap;
        self
    }

    pub fn clamped_to(mut self, bounds: Window) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Where in its lifecycle a [`DragUpdate`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    /// Live preview; may be emitted many times per drag.
    Preview,
    /// Final values after pointer release.
    Committed,
    /// The original values, restored after cancel.
    Cancelled,
}

/// New start/end for the dragged interval, to be applied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragUpdate {
    pub session_id: u64,
    pub interval_id: IntervalId,
    pub phase: DragPhase,
    pub start: Instant,
    pub end: Instant,
    /// Days the dragged edge(s) moved from their original position.
    pub day_delta: i64,
    /// Horizontal offset for drawing the dragged edge(s) during preview.
    pub preview_offset_px: f64,
}

/// State captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    id: u64,
    interval_id: IntervalId,
    mode: DragMode,
    origin_start: Instant,
    origin_end: Instant,
    options: DragOptions,
    last: Option<DragUpdate>,
}

impl DragSession {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn interval_id(&self) -> &IntervalId {
        &self.interval_id
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// The interval's start and end when the drag began.
    pub fn origin(&self) -> (Instant, Instant) {
        (self.origin_start, self.origin_end)
    }

    /// Apply a raw day delta to the original instants.
    /// Returns the new `(start, end)` and the delta actually applied.
    fn apply(&self, raw_delta: i64) -> (Instant, Instant, i64) {
        let delta = raw_delta.clamp(-MAX_DRAG_DAYS, MAX_DRAG_DAYS);
        let (os, oe) = (self.origin_start, self.origin_end);

        match self.mode {
            DragMode::Move => {
                let delta = match self.options.bounds {
                    Some(bounds) => {
                        let (low, high) = (os.min(oe), os.max(oe));
                        let min_delta = day_delta(low, bounds.start());
                        let max_delta = day_delta(high, bounds.end());
                        if min_delta <= max_delta {
                            clamp(delta, min_delta, max_delta)
                        } else {
                            // Longer than the bounds: it may only move while still covering them.
                            clamp(delta, max_delta, min_delta)
                        }
                    }
                    None => delta,
                };
                match (os.checked_add_days(delta), oe.checked_add_days(delta)) {
                    (Some(start), Some(end)) => (start, end, delta),
                    _ => (os, oe, 0),
                }
            }
            DragMode::ResizeStart => {
                let mut start = os.checked_add_days(delta).unwrap_or(os);
                if let Some(bounds) = self.options.bounds {
                    start = clamp(start, bounds.start(), bounds.end());
                }
                // Minimum one-day span.
                if start > oe {
                    start = oe;
                }
                (start, oe, day_delta(os, start))
            }
            DragMode::ResizeEnd => {
                let mut end = oe.checked_add_days(delta).unwrap_or(oe);
                if let Some(bounds) = self.options.bounds {
                    end = clamp(end, bounds.start(), bounds.end());
                }
                if end < os {
                    end = os;
                }
                (os, end, day_delta(oe, end))
            }
        }
    }

    fn update(
        &self,
        phase: DragPhase,
        start: Instant,
        end: Instant,
        day_delta: i64,
        preview_offset_px: f64,
    ) -> DragUpdate {
        DragUpdate {
            session_id: self.id,
            interval_id: self.interval_id.clone(),
            phase,
            start,
            end,
            day_delta,
            preview_offset_px,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Owns at most one drag session at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    sessions_started: u64,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn mode(&self) -> Option<DragMode> {
        self.session().map(DragSession::mode)
    }

    /// Start dragging `interval` (pointer-down). Returns the new session id.
    ///
    /// # Errors
    /// Returns `TimelineError::DragInProgress` if a session is already active;
    /// the active session is left untouched.
    pub fn begin(
        &mut self,
        interval: &Interval,
        mode: DragMode,
        options: DragOptions,
    ) -> Result<u64> {
        if let DragState::Dragging(active) = &self.state {
            return Err(TimelineError::DragInProgress(active.id));
        }

        self.sessions_started += 1;
        let id = self.sessions_started;
        debug!(
            session = id,
            interval = %interval.id,
            ?mode,
            start = %interval.start,
            end = %interval.end,
            "drag started"
        );
        self.state = DragState::Dragging(DragSession {
            id,
            interval_id: interval.id.clone(),
            mode,
            origin_start: interval.start,
            origin_end: interval.end,
            options,
            last: None,
        });
        Ok(id)
    }

    /// Feed a pointer offset (relative to pointer-down) and get the live preview.
    ///
    /// # Errors
    /// Returns `TimelineError::NoActiveDrag` when idle.
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> Result<DragUpdate> {
        let DragState::Dragging(session) = &mut self.state else {
            return Err(TimelineError::NoActiveDrag);
        };

        let px_per_day = session.options.px_per_day;
        let raw_delta = day_delta_from_px(dx, px_per_day);
        let (start, end, applied) = session.apply(raw_delta);
        let preview_offset_px = if session.options.snap || applied != raw_delta {
            applied as f64 * px_per_day
        } else {
            dx
        };

        let update = session.update(DragPhase::Preview, start, end, applied, preview_offset_px);
        trace!(
            session = session.id,
            dx,
            dy,
            day_delta = applied,
            %start,
            %end,
            "drag preview"
        );
        session.last = Some(update.clone());
        Ok(update)
    }

    /// Pointer released: the last preview becomes final and the controller goes idle.
    ///
    /// # Errors
    /// Returns `TimelineError::NoActiveDrag` when idle.
    pub fn release(&mut self) -> Result<DragUpdate> {
        let session = self.take_session()?;
        let update = match &session.last {
            Some(last) => session.update(
                DragPhase::Committed,
                last.start,
                last.end,
                last.day_delta,
                last.preview_offset_px,
            ),
            None => session.update(
                DragPhase::Committed,
                session.origin_start,
                session.origin_end,
                0,
                0.0,
            ),
        };
        debug!(session = session.id, start = %update.start, end = %update.end, "drag committed");
        Ok(update)
    }

    /// Abort the drag: returns the original start/end once and goes idle.
    ///
    /// # Errors
    /// Returns `TimelineError::NoActiveDrag` when idle.
    pub fn cancel(&mut self) -> Result<DragUpdate> {
        let session = self.take_session()?;
        debug!(session = session.id, "drag cancelled");
        Ok(session.update(
            DragPhase::Cancelled,
            session.origin_start,
            session.origin_end,
            0,
            0.0,
        ))
    }

    /// Cancel only if the active session is dragging `interval_id`, e.g. when
    /// that interval was deleted by another action. Returns the revert update.
    pub fn cancel_if_dragging(&mut self, interval_id: &IntervalId) -> Option<DragUpdate> {
        let dragging_it = self
            .session()
            .is_some_and(|s| &s.interval_id == interval_id);
        if dragging_it {
            self.cancel().ok()
        } else {
            None
        }
    }

    /// Dispatch a pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> Result<DragUpdate> {
        match event {
            PointerEvent::Move { dx, dy } => self.pointer_move(dx, dy),
            PointerEvent::Release => self.release(),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    fn take_session(&mut self) -> Result<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Ok(session),
            DragState::Idle => Err(TimelineError::NoActiveDrag),
        }
    }
}
