//! # timeline-engine
//!
//! Layout and interval-editing engine for resource timelines.
//!
//! Given a list of date-ranged intervals assigned to resources, a visible window
//! and a granularity, the engine derives everything a renderer needs: aligned
//! axis ticks, per-interval bar geometry, milestone markers, and per-resource
//! scheduling conflicts. A small drag state machine turns pointer offsets into
//! snapped start/end edits of one interval.
//!
//! All dates are [`Instant`]s pinned to noon UTC, so day arithmetic is exact no
//! matter which timezone the host runs in. Apart from [`DragController`], every
//! function is pure.
//!
//! ## Modules
//!
//! - [`date`]: canonical dates, parsing, whole-day arithmetic
//! - [`ticks`]: axis ticks per granularity
//! - [`geometry`]: date → pixel/percentage mapping, bar and marker layout
//! - [`conflict`]: overlapping intervals per resource
//! - [`drag`]: move/resize state machine
//! - [`view`]: record ingestion and one-call rendering
//! - [`store`]: serializable state with pure update functions
//! - [`config`]: rendering configuration
//! - [`model`]: shared domain types
//! - [`error`]: error types

pub mod config;
pub mod conflict;
pub mod date;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod model;
pub mod store;
pub mod ticks;
pub mod view;

pub use config::TimelineConfig;
pub use conflict::{find_conflicts, Conflict};
pub use date::{add_days, day_delta, day_of_week, format, normalize, Instant};
pub use drag::{DragController, DragMode, DragOptions, DragPhase, DragUpdate, PointerEvent};
pub use error::TimelineError;
pub use geometry::{clamp, layout_bars, width_from_range, x_from_date, Bar, ClampPolicy, Scale};
pub use model::{Interval, IntervalId, Resource, ResourceId, Warning, Window};
pub use store::{apply, Action, TimelineStore};
pub use ticks::{generate_ticks, Granularity, Tick};
pub use view::{ingest, render, render_document, IntervalRecord, TimelineDocument, TimelineView};
