//! WASM bindings for timeline-engine.
//!
//! Exposes tick generation, bar layout, conflict detection and one-call
//! rendering to JavaScript via `wasm-bindgen`. All complex types are passed as
//! JSON strings; errors are thrown as JS strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timeline-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/timeline-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/timeline_engine_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/timeline-js/wasm/timeline_engine_wasm.js \
//!    packages/timeline-js/wasm/timeline_engine_wasm.cjs
//! ```

use serde::Serialize;
use timeline_engine::date::parse_week_start;
use timeline_engine::view::{ingest, reversed_range_warnings, IntervalRecord};
use timeline_engine::{
    generate_ticks, layout_bars, normalize, render_document, Bar, ClampPolicy, Conflict,
    Granularity, Scale, TimelineDocument, Warning, Window,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TickDto {
    date: String,
    label: String,
    nominal_width: f64,
}

#[derive(Serialize)]
struct LayoutDto {
    bars: Vec<Bar>,
    warnings: Vec<Warning>,
}

#[derive(Serialize)]
struct ConflictsDto {
    conflicts: Vec<Conflict>,
    warnings: Vec<Warning>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Errors cross the boundary as plain messages; the exports wrap them in `JsValue`.
type BoundaryResult<T> = std::result::Result<T, String>;

fn parse_window(start: &str, end: &str) -> BoundaryResult<Window> {
    let start = normalize(start).map_err(|e| e.to_string())?;
    let end = normalize(end).map_err(|e| e.to_string())?;
    Window::new(start, end).map_err(|e| e.to_string())
}

fn parse_records(json: &str) -> BoundaryResult<Vec<IntervalRecord>> {
    serde_json::from_str(json).map_err(|e| format!("Invalid intervals JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> BoundaryResult<String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn ticks_json(
    start: &str,
    end: &str,
    granularity: &str,
    week_start: &str,
) -> BoundaryResult<String> {
    let window = parse_window(start, end)?;
    let granularity = granularity
        .parse::<Granularity>()
        .map_err(|e| e.to_string())?;
    let week_start = parse_week_start(week_start).map_err(|e| e.to_string())?;

    let dtos: Vec<TickDto> = generate_ticks(&window, granularity, week_start)
        .into_iter()
        .map(|t| TickDto {
            date: t.instant.to_string(),
            label: t.label,
            nominal_width: t.nominal_width,
        })
        .collect();
    to_json(&dtos)
}

fn layout_json(
    intervals_json: &str,
    start: &str,
    end: &str,
    scale_json: &str,
    clamped: bool,
) -> BoundaryResult<String> {
    let window = parse_window(start, end)?;
    let scale: Scale =
        serde_json::from_str(scale_json).map_err(|e| format!("Invalid scale JSON: {}", e))?;
    scale.validate().map_err(|e| e.to_string())?;
    let policy = if clamped {
        ClampPolicy::Clamped
    } else {
        ClampPolicy::Unclamped
    };

    let ingested = ingest(&parse_records(intervals_json)?, &[]);
    let mut warnings = ingested.warnings;
    warnings.extend(reversed_range_warnings(&ingested.intervals));

    to_json(&LayoutDto {
        bars: layout_bars(&ingested.intervals, &window, scale, policy),
        warnings,
    })
}

fn conflicts_json(intervals_json: &str) -> BoundaryResult<String> {
    let ingested = ingest(&parse_records(intervals_json)?, &[]);
    to_json(&ConflictsDto {
        conflicts: timeline_engine::find_conflicts(&ingested.intervals),
        warnings: ingested.warnings,
    })
}

fn render_json(input_json: &str) -> BoundaryResult<String> {
    let doc: TimelineDocument =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid timeline JSON: {}", e))?;
    let view = render_document(&doc).map_err(|e| e.to_string())?;
    to_json(&view)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate axis ticks for a window.
///
/// Returns a JSON array of `{date, label, nominal_width}` objects.
///
/// # Arguments
/// - `start`, `end` -- inclusive window bounds (e.g., "2025-01-01")
/// - `granularity` -- "day", "week", "month", "quarter" or "year"
/// - `week_start` -- weekday name anchoring week ticks (e.g., "monday")
#[wasm_bindgen(js_name = "generateTicks")]
pub fn generate_ticks_js(
    start: &str,
    end: &str,
    granularity: &str,
    week_start: &str,
) -> Result<String, JsValue> {
    ticks_json(start, end, granularity, week_start).map_err(|e| JsValue::from_str(&e))
}

/// Compute `{left, width}` geometry for every interval.
///
/// `intervals_json` is an array of `{id, start, end, resources}` records.
/// `scale_json` is `{"px_per_day": N}` or `"percent"`. Returns
/// `{bars, warnings}`; records with unparsable dates become warnings.
#[wasm_bindgen(js_name = "layoutBars")]
pub fn layout_bars_js(
    intervals_json: &str,
    start: &str,
    end: &str,
    scale_json: &str,
    clamped: Option<bool>,
) -> Result<String, JsValue> {
    layout_json(intervals_json, start, end, scale_json, clamped.unwrap_or(false))
        .map_err(|e| JsValue::from_str(&e))
}

/// Find every pair of intervals that share a resource and a day.
///
/// Returns `{conflicts, warnings}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts_js(intervals_json: &str) -> Result<String, JsValue> {
    conflicts_json(intervals_json).map_err(|e| JsValue::from_str(&e))
}

/// Render a whole timeline document (window, granularity, intervals,
/// milestones, config) into ticks, bars, markers, conflicts and warnings.
#[wasm_bindgen(js_name = "renderTimeline")]
pub fn render_timeline_js(input_json: &str) -> Result<String, JsValue> {
    render_json(input_json).map_err(|e| JsValue::from_str(&e))
}
