// src/cli.rs

//! CLI argument parsing using `clap`, plus the small input parsers for
//! instants, dates and recurrence day lists.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};

use crate::errors::{Result, TimeblockError};

/// Command-line arguments for `timeblock`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "timeblock",
    version,
    about = "Plan your day as time blocks and get transition warnings.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Timeblock.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Timeblock.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TIMEBLOCK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the scheduler daemon: watch the store and deliver warnings.
    Watch,

    /// Add a task.
    Add {
        #[arg(long)]
        title: String,

        /// Start instant, `YYYY-MM-DD HH:MM` local time.
        #[arg(long, value_name = "WHEN")]
        start: String,

        /// Duration in minutes (defaults per config when omitted/invalid).
        #[arg(long, value_name = "MIN")]
        duration: Option<i64>,

        /// Display accent, e.g. `#0ea5e9`.
        #[arg(long)]
        color: Option<String>,

        /// Weekly recurrence: comma-separated weekdays, by name (`mon,wed`)
        /// or index (`1,3`; 0 = Sunday).
        #[arg(long, value_name = "DAYS")]
        repeat: Option<String>,
    },

    /// Edit fields of an existing task; omitted fields keep their values.
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New start instant, `YYYY-MM-DD HH:MM` local time.
        #[arg(long, value_name = "WHEN")]
        start: Option<String>,

        /// New duration in minutes.
        #[arg(long, value_name = "MIN")]
        duration: Option<i64>,

        #[arg(long)]
        color: Option<String>,

        /// Replace the weekly recurrence (same syntax as `add --repeat`).
        #[arg(long, value_name = "DAYS")]
        repeat: Option<String>,

        /// Remove the weekly recurrence, turning the task into a one-off.
        #[arg(long, conflicts_with = "repeat")]
        clear_repeat: bool,

        /// Add an exception date (`YYYY-MM-DD`) on which the series is
        /// skipped.
        #[arg(long, value_name = "DATE")]
        except: Option<String>,
    },

    /// Delete a task and, with it, every occurrence it generates.
    Rm { id: String },

    /// Relocate one occurrence. One-offs are moved; recurring occurrences
    /// follow the split rule (same-date moves except the original date and
    /// create a one-off, cross-date moves add an extra instance).
    Move {
        id: String,

        /// Calendar date of the occurrence being moved (`YYYY-MM-DD`).
        #[arg(long, value_name = "DATE")]
        date: String,

        /// New start instant, `YYYY-MM-DD HH:MM` (snapped to 5 minutes).
        #[arg(long, value_name = "WHEN")]
        to: String,
    },

    /// Print the occurrences in a window, one per line.
    Agenda {
        /// First day of the window (`YYYY-MM-DD`); defaults to today.
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Number of days to expand.
        #[arg(long, default_value_t = 7)]
        days: i64,
    },

    /// Show the active and next occurrence.
    Status,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Parse a `YYYY-MM-DD HH:MM` (or `YYYY-MM-DDTHH:MM`) local instant.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| {
            TimeblockError::InvalidInput(format!(
                "invalid instant {s:?} (expected YYYY-MM-DD HH:MM): {e}"
            ))
        })
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
        TimeblockError::InvalidInput(format!("invalid date {s:?} (expected YYYY-MM-DD): {e}"))
    })
}

/// Parse a comma-separated weekday list: names (`sun`, `monday`) or indices
/// (0 = Sunday .. 6 = Saturday). An empty string yields an empty list.
pub fn parse_repeat(s: &str) -> Result<Vec<i32>> {
    let mut days = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Ok(idx) = part.parse::<i32>() {
            days.push(idx);
            continue;
        }
        let idx = match part.to_lowercase().as_str() {
            p if p.starts_with("sun") => 0,
            p if p.starts_with("mon") => 1,
            p if p.starts_with("tue") => 2,
            p if p.starts_with("wed") => 3,
            p if p.starts_with("thu") => 4,
            p if p.starts_with("fri") => 5,
            p if p.starts_with("sat") => 6,
            other => {
                return Err(TimeblockError::InvalidInput(format!(
                    "invalid weekday {other:?} (expected sun..sat or 0..6)"
                )))
            }
        };
        days.push(idx);
    }
    Ok(days)
}
