//! `timeline` CLI: generate ticks, lay out bars, detect conflicts, and render
//! whole timelines from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Month ticks for Q1
//! timeline ticks --start 2025-01-01 --end 2025-03-31 --granularity month
//!
//! # Monday-anchored week ticks
//! timeline ticks --start 2025-01-01 --end 2025-01-31 --granularity week --week-start monday
//!
//! # Bar geometry for an interval list (stdin → stdout)
//! cat intervals.json | timeline layout --start 2025-01-01 --end 2025-03-31 --px-per-day 4
//!
//! # Percentage layout, clamped to the window, written to a file
//! timeline layout -i intervals.json --start 2025-01-01 --end 2025-03-31 --percent --clamp -o bars.json
//!
//! # Per-resource conflicts
//! timeline conflicts -i intervals.json
//!
//! # Full render of a timeline document, with a config file
//! timeline render -i document.json --config timeline.json
//! ```
//!
//! Logs go to stderr and are controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};
use timeline_engine::date::parse_week_start;
use timeline_engine::view::{ingest, reversed_range_warnings, IntervalRecord};
use timeline_engine::{
    find_conflicts, generate_ticks, layout_bars, normalize, render_document, ClampPolicy,
    Granularity, Scale, TimelineConfig, TimelineDocument, Window,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timeline",
    version,
    about = "Timeline layout, tick generation and conflict detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate axis ticks for a window
    Ticks {
        /// First day of the window (e.g., 2025-01-01)
        #[arg(long)]
        start: String,
        /// Last day of the window, inclusive
        #[arg(long)]
        end: String,
        /// day, week, month, quarter or year
        #[arg(long, default_value = "day")]
        granularity: String,
        /// Weekday that week ticks align to
        #[arg(long, default_value = "sunday")]
        week_start: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute bar geometry for a JSON array of interval records
    Layout {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Pixels per day (defaults to 30)
        #[arg(long, conflicts_with = "percent")]
        px_per_day: Option<f64>,
        /// Lay out as percentages of the window width
        #[arg(long)]
        percent: bool,
        /// Clip bars to the window
        #[arg(long)]
        clamp: bool,
    },
    /// Find per-resource conflicts in a JSON array of interval records
    Conflicts {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render a timeline document into ticks, bars, markers and conflicts
    Render {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Config file replacing the document's `config`
        #[arg(long)]
        config: Option<String>,
        /// Override the document's granularity
        #[arg(long)]
        granularity: Option<String>,
    },
}

#[derive(Serialize)]
struct TickOutput {
    date: String,
    label: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ticks {
            start,
            end,
            granularity,
            week_start,
            output,
        } => {
            let window = parse_window(&start, &end)?;
            let granularity = granularity
                .parse::<Granularity>()
                .context("Invalid --granularity")?;
            let week_start = parse_week_start(&week_start).context("Invalid --week-start")?;

            let ticks: Vec<TickOutput> = generate_ticks(&window, granularity, week_start)
                .into_iter()
                .map(|t| TickOutput {
                    date: t.instant.to_string(),
                    label: t.label,
                })
                .collect();
            write_json(output.as_deref(), &ticks)?;
        }
        Commands::Layout {
            input,
            output,
            start,
            end,
            px_per_day,
            percent,
            clamp,
        } => {
            let window = parse_window(&start, &end)?;
            let scale = if percent {
                Scale::Percent
            } else {
                px_per_day.map(Scale::PxPerDay).unwrap_or_default()
            };
            let config = TimelineConfig {
                scale,
                ..TimelineConfig::default()
            };
            config.validate().context("Invalid --px-per-day")?;
            let policy = if clamp {
                ClampPolicy::Clamped
            } else {
                ClampPolicy::Unclamped
            };

            let records = read_records(input.as_deref())?;
            let ingested = ingest(&records, &[]);
            for warning in reversed_range_warnings(&ingested.intervals) {
                warn!(?warning, "interval ends before it starts");
            }
            let bars = layout_bars(&ingested.intervals, &window, scale, policy);
            write_json(output.as_deref(), &bars)?;
        }
        Commands::Conflicts { input, output } => {
            let records = read_records(input.as_deref())?;
            let ingested = ingest(&records, &[]);
            let conflicts = find_conflicts(&ingested.intervals);
            debug!(count = conflicts.len(), "found conflicts");
            write_json(output.as_deref(), &conflicts)?;
        }
        Commands::Render {
            input,
            output,
            config,
            granularity,
        } => {
            let json = read_input(input.as_deref())?;
            let mut doc: TimelineDocument =
                serde_json::from_str(&json).context("Failed to parse timeline document")?;
            if let Some(path) = config {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path))?;
                doc.config = TimelineConfig::from_json_str(&text)
                    .with_context(|| format!("Invalid config file: {}", path))?;
            }
            if let Some(granularity) = granularity {
                doc.granularity = granularity
                    .parse::<Granularity>()
                    .context("Invalid --granularity")?;
            }

            let view = render_document(&doc).context("Failed to render timeline")?;
            write_json(output.as_deref(), &view)?;
        }
    }

    Ok(())
}

fn parse_window(start: &str, end: &str) -> Result<Window> {
    let start = normalize(start).context("Invalid --start")?;
    let end = normalize(end).context("Invalid --end")?;
    Ok(Window::new(start, end)?)
}

fn read_records(path: Option<&str>) -> Result<Vec<IntervalRecord>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse interval records")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    write_output(path, &content)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
