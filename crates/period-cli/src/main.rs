//! `periods` CLI — query time period collections and format relative times.
//!
//! ## Usage
//!
//! ```sh
//! # Periods lying within a window (collection JSON on stdin)
//! periods query --inside 2026-03-01T09:00:00Z 2026-03-01T14:00:00Z < day.json
//!
//! # Periods containing an instant, sorted by duration, longest first
//! periods query -i day.json --at 2026-03-01T12:00:00Z --sort duration --desc
//!
//! # Classify two periods against each other
//! periods relate 2026-03-01T10:00:00Z 2026-03-01T12:00:00Z \
//!                2026-03-01T12:00:00Z 2026-03-01T14:00:00Z
//!
//! # Relative phrase, with a custom translation table
//! periods ago 2026-03-14T10:00:00Z --now 2026-03-15T12:00:00Z --strings pl.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use period_engine::{
    Calendar, DateAgoFormat, EnglishLocalizer, Localizer, TableLocalizer, TimeAgo, TimePeriod,
    TimePeriodCollection,
};

#[derive(Parser)]
#[command(
    name = "periods",
    version,
    about = "Time period collections and relative-time phrases"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and sort a collection read as JSON
    Query {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Keep periods lying within START..END
        #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_instant, group = "filter")]
        inside: Option<Vec<DateTime<Utc>>>,
        /// Keep periods sharing at least one instant with START..END
        #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_instant, group = "filter")]
        intersects: Option<Vec<DateTime<Utc>>>,
        /// Keep periods sharing more than one instant with START..END
        #[arg(long, num_args = 2, value_names = ["START", "END"], value_parser = parse_instant, group = "filter")]
        overlaps: Option<Vec<DateTime<Utc>>>,
        /// Keep periods containing INSTANT, boundaries included
        #[arg(long, value_name = "INSTANT", value_parser = parse_instant, group = "filter")]
        at: Option<DateTime<Utc>>,
        /// Sort the result by this key
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Sort in descending order (requires --sort)
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Show how period A relates to period B
    Relate {
        #[arg(value_parser = parse_instant)]
        a_start: DateTime<Utc>,
        #[arg(value_parser = parse_instant)]
        a_end: DateTime<Utc>,
        #[arg(value_parser = parse_instant)]
        b_start: DateTime<Utc>,
        #[arg(value_parser = parse_instant)]
        b_end: DateTime<Utc>,
    },
    /// Describe an instant relative to now ("3 hours ago")
    Ago {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
        /// Reference instant (defaults to the current time)
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
        #[arg(long, value_enum, default_value_t = FormatArg::Long)]
        format: FormatArg,
        /// JSON translation table (key -> template); English if omitted
        #[arg(long)]
        strings: Option<String>,
        /// IANA timezone for calendar dates (defaults to $TZ, then the system zone)
        #[arg(long)]
        tz: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Start,
    End,
    Duration,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Short,
    Week,
    Long,
    NumericDates,
    NumericTimes,
    Numeric,
}

impl From<FormatArg> for DateAgoFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Short => DateAgoFormat::Short,
            FormatArg::Week => DateAgoFormat::Week,
            FormatArg::Long => DateAgoFormat::Long,
            FormatArg::NumericDates => DateAgoFormat::LongUsingNumericDates,
            FormatArg::NumericTimes => DateAgoFormat::LongUsingNumericTimes,
            FormatArg::Numeric => DateAgoFormat::LongUsingNumericDatesAndTimes,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Query {
            input,
            output,
            inside,
            intersects,
            overlaps,
            at,
            sort,
            desc,
        } => {
            let json = read_input(input.as_deref())?;
            let collection: TimePeriodCollection =
                serde_json::from_str(&json).context("Failed to parse period collection")?;
            log::info!(
                "loaded {} periods in {}",
                collection.len(),
                collection.calendar()
            );

            let mut result = if let Some(bounds) = inside {
                collection.periods_inside(&period_from(&bounds)?)
            } else if let Some(bounds) = intersects {
                collection.periods_intersected_by_period(&period_from(&bounds)?)
            } else if let Some(bounds) = overlaps {
                collection.periods_overlapped_by_period(&period_from(&bounds)?)
            } else if let Some(instant) = at {
                collection.periods_intersected_by_date(instant)
            } else {
                collection
            };

            match (sort, desc) {
                (Some(SortKey::Start), false) => result.sort_by_start_ascending(),
                (Some(SortKey::Start), true) => result.sort_by_start_descending(),
                (Some(SortKey::End), false) => result.sort_by_end_ascending(),
                (Some(SortKey::End), true) => result.sort_by_end_descending(),
                (Some(SortKey::Duration), false) => result.sort_by_duration_ascending(),
                (Some(SortKey::Duration), true) => result.sort_by_duration_descending(),
                (None, _) => {}
            }
            log::info!("{} periods selected", result.len());

            let mut pretty = serde_json::to_string_pretty(&result)?;
            pretty.push('\n');
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Relate {
            a_start,
            a_end,
            b_start,
            b_end,
        } => {
            let a = TimePeriod::new(a_start, a_end).context("Invalid period A")?;
            let b = TimePeriod::new(b_start, b_end).context("Invalid period B")?;
            let relation = serde_json::to_value(a.relation_to(&b))?;

            println!("relation: {}", relation.as_str().unwrap_or_default());
            println!("is_inside: {}", a.is_inside(&b));
            println!("intersects: {}", a.intersects(&b));
            println!("overlaps_with: {}", a.overlaps_with(&b));
            if let Some(gap) = a.gap(&b) {
                println!("gap_seconds: {}", gap.num_seconds());
            }
        }
        Commands::Ago {
            instant,
            now,
            format,
            strings,
            tz,
        } => {
            let calendar = match tz.as_deref() {
                Some(name) => Calendar::from_name(name)?,
                None => Calendar::current(),
            };
            let localizer: Box<dyn Localizer> = match strings.as_deref() {
                Some(path) => {
                    let table = read_input(Some(path))?;
                    Box::new(
                        TableLocalizer::from_json(&table)
                            .with_context(|| format!("Failed to load strings from {}", path))?,
                    )
                }
                None => Box::new(EnglishLocalizer),
            };
            let now = now.unwrap_or_else(|| calendar.now());
            log::debug!("formatting {instant} against {now} in {calendar}");

            let phrase = TimeAgo::new(calendar, localizer.as_ref())
                .time_ago(instant, now, format.into())
                .context("Failed to format relative time")?;
            println!("{}", phrase);
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Utc::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to install logger")
}

fn parse_instant(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn period_from(bounds: &[DateTime<Utc>]) -> Result<TimePeriod> {
    match bounds {
        [start, end] => TimePeriod::new(*start, *end).context("Invalid reference period"),
        _ => anyhow::bail!("Expected START and END, got {} values", bounds.len()),
    }
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
