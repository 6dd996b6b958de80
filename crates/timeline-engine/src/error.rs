//! Error types for timeline-engine operations.

use thiserror::Error;

use crate::date::Instant;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// The input could not be parsed into a valid calendar date.
    /// Callers treat the affected date as absent rather than aborting.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A window whose end precedes its start. Fatal to tick and geometry generation.
    #[error("Invalid window: end {end} is before start {start}")]
    InvalidWindow { start: Instant, end: Instant },

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid week start: {0}")]
    InvalidWeekStart(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("A drag session ({0}) is already in progress")]
    DragInProgress(u64),

    #[error("No drag session is active")]
    NoActiveDrag,

    #[error("Unknown interval: {0}")]
    UnknownInterval(String),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
