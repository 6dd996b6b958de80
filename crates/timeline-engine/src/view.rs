//! One-call composition of the engine for a rendering layer.
//!
//! Hosts hand in plain records with calendar-date strings; [`ingest`] turns them
//! into typed intervals and milestones, dropping unparsable dates with a
//! warning, and [`render`] derives ticks, bars, markers and conflicts from them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TimelineConfig;
use crate::conflict::{conflicting_interval_ids, find_conflicts, Conflict};
use crate::date::{normalize, parse_date_list};
use crate::error::Result;
use crate::geometry::{layout_bars, layout_markers, Bar, Marker};
use crate::model::{Interval, IntervalId, MarkerStyle, Milestone, ResourceId, Warning, Window};
use crate::ticks::{generate_ticks, Granularity, Tick};

/// An interval as the host stores it, with plain date strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub id: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl IntervalRecord {
    /// # Errors
    /// Returns `TimelineError::InvalidDate` if either date does not parse.
    pub fn to_interval(&self) -> Result<Interval> {
        Ok(Interval {
            id: IntervalId(self.id.clone()),
            start: normalize(&self.start)?,
            end: normalize(&self.end)?,
            resource_ids: self
                .resources
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(ResourceId::from)
                .collect(),
            metadata: self.metadata.clone(),
        })
    }
}

/// A milestone as the host stores it: a comma-separated date field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    pub id: String,
    pub dates: String,
    #[serde(default)]
    pub style: MarkerStyle,
}

/// Typed data produced by [`ingest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingested {
    pub intervals: Vec<Interval>,
    pub milestones: Vec<Milestone>,
    pub warnings: Vec<Warning>,
}

/// Parse host records. Never fails: unparsable dates are dropped and reported.
///
/// An interval record with an invalid start or end is dropped entirely (it has
/// no position). A milestone keeps its valid dates; each rejected date yields
/// one warning.
pub fn ingest(intervals: &[IntervalRecord], milestones: &[MilestoneRecord]) -> Ingested {
    let mut out = Ingested::default();

    for record in intervals {
        match record.to_interval() {
            Ok(interval) => out.intervals.push(interval),
            Err(_) => {
                for (field, value) in [("start", &record.start), ("end", &record.end)] {
                    if normalize(value).is_err() {
                        warn!(
                            record = %record.id,
                            field,
                            value = %value,
                            "dropping interval with invalid date"
                        );
                        out.warnings.push(Warning::InvalidDate {
                            record_id: record.id.clone(),
                            field: field.to_string(),
                            value: value.clone(),
                        });
                    }
                }
            }
        }
    }

    for record in milestones {
        let parsed = parse_date_list(&record.dates);
        for value in parsed.rejected {
            warn!(record = %record.id, value = %value, "skipping invalid milestone date");
            out.warnings.push(Warning::InvalidDate {
                record_id: record.id.clone(),
                field: "dates".to_string(),
                value,
            });
        }
        out.milestones.push(Milestone {
            id: record.id.clone(),
            dates: parsed.dates,
            style: record.style,
        });
    }

    out
}

/// A `ReversedRange` warning for every interval that ends before it starts.
pub fn reversed_range_warnings(intervals: &[Interval]) -> Vec<Warning> {
    intervals
        .iter()
        .filter(|i| i.is_reversed())
        .map(|i| Warning::ReversedRange {
            interval_id: i.id.clone(),
            start: i.start,
            end: i.end,
        })
        .collect()
}

/// Everything [`render`] needs.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub intervals: &'a [Interval],
    pub milestones: &'a [Milestone],
    pub window: &'a Window,
    pub granularity: Granularity,
    pub config: &'a TimelineConfig,
}

/// The derived, render-ready picture of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineView {
    pub window: Window,
    pub granularity: Granularity,
    /// Total width of the window under the configured scale.
    pub extent: f64,
    pub ticks: Vec<Tick>,
    pub bars: Vec<Bar>,
    pub markers: Vec<Marker>,
    pub conflicts: Vec<Conflict>,
    /// Interval ids to highlight as conflicting.
    pub conflicting: BTreeSet<IntervalId>,
    pub warnings: Vec<Warning>,
}

/// Derive ticks, geometry, conflicts and warnings in one pure call.
///
/// # Errors
/// Returns `TimelineError::InvalidConfig` if the config does not validate.
pub fn render(input: &RenderInput<'_>) -> Result<TimelineView> {
    input.config.validate()?;
    let window = *input.window;
    let scale = input.config.scale;

    let conflicts = find_conflicts(input.intervals);
    Ok(TimelineView {
        window,
        granularity: input.granularity,
        extent: scale.extent(&window),
        ticks: generate_ticks(&window, input.granularity, input.config.week_start),
        bars: layout_bars(input.intervals, &window, scale, input.config.clamp),
        markers: layout_markers(input.milestones, &window, scale),
        conflicting: conflicting_interval_ids(&conflicts),
        conflicts,
        warnings: reversed_range_warnings(input.intervals),
    })
}

/// A complete host request with plain-data records, as exchanged over JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    pub window_start: String,
    pub window_end: String,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub intervals: Vec<IntervalRecord>,
    #[serde(default)]
    pub milestones: Vec<MilestoneRecord>,
    #[serde(default)]
    pub config: TimelineConfig,
}

impl TimelineDocument {
    /// The document's window.
    ///
    /// # Errors
    /// Returns `TimelineError::InvalidDate` or `TimelineError::InvalidWindow`; both
    /// are fatal since no tick sequence can be produced without a window.
    pub fn window(&self) -> Result<Window> {
        Window::new(normalize(&self.window_start)?, normalize(&self.window_end)?)
    }
}

/// Ingest and render a [`TimelineDocument`]. Ingestion warnings come first.
///
/// # Errors
/// Fails only on an invalid window or config.
pub fn render_document(doc: &TimelineDocument) -> Result<TimelineView> {
    let window = doc.window()?;
    let ingested = ingest(&doc.intervals, &doc.milestones);
    let mut view = render(&RenderInput {
        intervals: &ingested.intervals,
        milestones: &ingested.milestones,
        window: &window,
        granularity: doc.granularity,
        config: &doc.config,
    })?;

    let mut warnings = ingested.warnings;
    warnings.append(&mut view.warnings);
    view.warnings = warnings;
    Ok(view)
}
