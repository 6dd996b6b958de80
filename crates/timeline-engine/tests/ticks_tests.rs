//! Tests for axis tick generation.

use chrono::Weekday;
use timeline_engine::date::{normalize, Instant};
use timeline_engine::ticks::{generate_ticks, ticks, Granularity};
use timeline_engine::{TimelineError, Window};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn d(s: &str) -> Instant {
    normalize(s).unwrap()
}

fn window(start: &str, end: &str) -> Window {
    Window::new(d(start), d(end)).unwrap()
}

fn tick_dates(w: &Window, g: Granularity, week_start: Weekday) -> Vec<String> {
    generate_ticks(w, g, week_start)
        .iter()
        .map(|t| t.instant.to_string())
        .collect()
}

// ── Month ───────────────────────────────────────────────────────────────────

#[test]
fn first_quarter_of_2025_has_three_month_ticks() {
    let w = window("2025-01-01", "2025-03-31");
    assert_eq!(
        tick_dates(&w, Granularity::Month, Weekday::Sun),
        vec!["2025-01-01", "2025-02-01", "2025-03-01"]
    );
}

#[test]
fn month_head_tick_before_window_is_included() {
    let w = window("2025-01-15", "2025-03-10");
    assert_eq!(
        tick_dates(&w, Granularity::Month, Weekday::Sun),
        vec!["2025-01-01", "2025-02-01", "2025-03-01"]
    );
}

#[test]
fn month_ticks_cross_year_boundary() {
    let w = window("2024-11-20", "2025-02-01");
    assert_eq!(
        tick_dates(&w, Granularity::Month, Weekday::Sun),
        vec!["2024-11-01", "2024-12-01", "2025-01-01", "2025-02-01"]
    );
}

// ── Day ─────────────────────────────────────────────────────────────────────

#[test]
fn day_ticks_cover_window_inclusively() {
    let w = window("2025-01-01", "2025-01-03");
    assert_eq!(
        tick_dates(&w, Granularity::Day, Weekday::Sun),
        vec!["2025-01-01", "2025-01-02", "2025-01-03"]
    );
}

#[test]
fn single_day_window_has_one_day_tick() {
    let w = window("2025-06-15", "2025-06-15");
    assert_eq!(generate_ticks(&w, Granularity::Day, Weekday::Sun).len(), 1);
}

// ── Week ────────────────────────────────────────────────────────────────────

#[test]
fn week_ticks_start_on_the_previous_sunday() {
    // 2025-01-01 is a Wednesday.
    let w = window("2025-01-01", "2025-01-31");
    assert_eq!(
        tick_dates(&w, Granularity::Week, Weekday::Sun),
        vec!["2024-12-29", "2025-01-05", "2025-01-12", "2025-01-19", "2025-01-26"]
    );
}

#[test]
fn week_ticks_honor_monday_anchor() {
    let w = window("2025-01-01", "2025-01-31");
    assert_eq!(
        tick_dates(&w, Granularity::Week, Weekday::Mon),
        vec!["2024-12-30", "2025-01-06", "2025-01-13", "2025-01-20", "2025-01-27"]
    );
}

#[test]
fn week_tick_on_window_start_when_start_is_the_anchor() {
    let w = window("2025-01-05", "2025-01-11");
    assert_eq!(
        tick_dates(&w, Granularity::Week, Weekday::Sun),
        vec!["2025-01-05"]
    );
}

// ── Quarter / Year ──────────────────────────────────────────────────────────

#[test]
fn quarter_ticks_align_to_quarter_starts() {
    let w = window("2025-02-10", "2025-11-30");
    let ticks = generate_ticks(&w, Granularity::Quarter, Weekday::Sun);
    let dates: Vec<String> = ticks.iter().map(|t| t.instant.to_string()).collect();
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();

    assert_eq!(
        dates,
        vec!["2025-01-01", "2025-04-01", "2025-07-01", "2025-10-01"]
    );
    assert_eq!(labels, vec!["Q1 '25", "Q2 '25", "Q3 '25", "Q4 '25"]);
}

#[test]
fn year_ticks_align_to_january_first() {
    let w = window("2024-06-01", "2026-01-01");
    let ticks = generate_ticks(&w, Granularity::Year, Weekday::Sun);
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();

    assert_eq!(
        tick_dates(&w, Granularity::Year, Weekday::Sun),
        vec!["2024-01-01", "2025-01-01", "2026-01-01"]
    );
    assert_eq!(labels, vec!["2024", "2025", "2026"]);
}

// ── Labels and widths ───────────────────────────────────────────────────────

#[test]
fn labels_per_granularity() {
    let w = window("2025-01-05", "2025-01-05");
    assert_eq!(
        generate_ticks(&w, Granularity::Day, Weekday::Sun)[0].label,
        "Jan 5"
    );
    assert_eq!(
        generate_ticks(&w, Granularity::Week, Weekday::Sun)[0].label,
        "Jan 5"
    );
    assert_eq!(
        generate_ticks(&w, Granularity::Month, Weekday::Sun)[0].label,
        "Jan 2025"
    );
}

#[test]
fn ticks_carry_nominal_width_of_their_granularity() {
    let w = window("2025-01-01", "2025-12-31");
    for g in Granularity::ALL {
        for tick in generate_ticks(&w, g, Weekday::Sun) {
            assert_eq!(tick.nominal_width, g.nominal_width());
        }
    }
}

// ── Purity ──────────────────────────────────────────────────────────────────

#[test]
fn generation_is_restartable() {
    let w = window("2024-12-15", "2025-04-15");
    for g in Granularity::ALL {
        assert_eq!(
            generate_ticks(&w, g, Weekday::Wed),
            generate_ticks(&w, g, Weekday::Wed)
        );
        assert_eq!(
            ticks(&w, g, Weekday::Wed).count(),
            generate_ticks(&w, g, Weekday::Wed).len()
        );
    }
}

// ── Window validation ───────────────────────────────────────────────────────

#[test]
fn reversed_window_is_rejected() {
    let result = Window::new(d("2025-03-01"), d("2025-02-01"));
    assert!(matches!(result, Err(TimelineError::InvalidWindow { .. })));
}

#[test]
fn reversed_window_is_rejected_when_deserializing() {
    let json = r#"{"start":"2025-03-01","end":"2025-02-01"}"#;
    assert!(serde_json::from_str::<Window>(json).is_err());
}

// ── Granularity parsing and suggestion ──────────────────────────────────────

#[test]
fn granularity_parses_case_insensitively() {
    assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Month);
    assert_eq!("weeks".parse::<Granularity>().unwrap(), Granularity::Week);
    assert!(matches!(
        "fortnight".parse::<Granularity>(),
        Err(TimelineError::InvalidGranularity(_))
    ));
    assert_eq!(Granularity::Quarter.to_string(), "quarter");
}

#[test]
fn suggest_picks_finest_granularity_within_budget() {
    let w = window("2025-01-01", "2025-12-31");
    assert_eq!(Granularity::suggest(&w, 400, Weekday::Sun), Granularity::Day);
    assert_eq!(Granularity::suggest(&w, 12, Weekday::Sun), Granularity::Month);
    assert_eq!(Granularity::suggest(&w, 4, Weekday::Sun), Granularity::Quarter);
    assert_eq!(Granularity::suggest(&w, 1, Weekday::Sun), Granularity::Year);
    assert_eq!(Granularity::suggest(&w, 0, Weekday::Sun), Granularity::Year);
}

#[test]
fn suggest_anchors_week_ticks_on_week_start() {
    // Sunday through Saturday: one Sunday-anchored week, two Monday-anchored ones.
    let w = window("2025-01-05", "2025-01-11");
    assert_eq!(Granularity::suggest(&w, 1, Weekday::Sun), Granularity::Week);
    assert_eq!(Granularity::suggest(&w, 1, Weekday::Mon), Granularity::Month);
}

#[test]
fn week_ticks_at_the_first_representable_day() {
    let first = Instant::earliest();
    let w = Window::new(first, first.add_days(10)).unwrap();
    // The aligned week start would fall before the first representable day.
    let anchor = first.weekday().succ();

    let ticks = generate_ticks(&w, Granularity::Week, anchor);

    assert_eq!(ticks[0].instant, first);
    assert_eq!(ticks.len(), 2);
    assert!(ticks.windows(2).all(|p| p[0].instant < p[1].instant));
}
