// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mutate;
pub mod notify;
pub mod occurrence;
pub mod sched;
pub mod store;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::info;

use crate::cli::{parse_date, parse_instant, parse_repeat, CliArgs, Command};
use crate::clock::{Clock, WallClock};
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::mutate::Relocation;
use crate::notify::ConsoleSink;
use crate::sched::SchedulerRuntime;
use crate::store::{JsonTaskStore, NewTask, TaskPatch};
use crate::types::DateKey;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task store
/// - either the scheduler daemon (`watch`) or a one-shot command
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let store = JsonTaskStore::new(&cfg.store.path, cfg.tasks.default_duration_min);

    match args.command {
        Command::Watch => run_watch(&cfg, store).await,
        Command::Add { title, start, duration, color, repeat } => {
            cmd_add(&store, title, &start, duration, color, repeat.as_deref())
        }
        Command::Edit { id, title, start, duration, color, repeat, clear_repeat, except } => {
            cmd_edit(&store, &id, title, start, duration, color, repeat, clear_repeat, except)
        }
        Command::Rm { id } => cmd_rm(&store, &id),
        Command::Move { id, date, to } => cmd_move(&store, &id, &date, &to),
        Command::Agenda { from, days } => cmd_agenda(&store, from.as_deref(), days),
        Command::Status => cmd_status(&store),
    }
}

/// Run the scheduler daemon until Ctrl-C.
async fn run_watch(cfg: &ConfigFile, store: JsonTaskStore) -> Result<()> {
    if let Some(parent) = store.path().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let sink = ConsoleSink::new(cfg.notify.silent);
    let (runtime, handle) = SchedulerRuntime::new(store.clone(), sink, Arc::new(WallClock));

    // Companion CLI invocations mutate the store from other processes; the
    // watcher turns those writes into eager rebuilds.
    let _watcher_handle = watch::spawn_store_watcher(store.path(), handle.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            handle.shutdown().await;
        });
    }

    info!(store = ?store.path(), "watching task store");
    runtime.run().await?;
    Ok(())
}

fn cmd_add(
    store: &JsonTaskStore,
    title: String,
    start: &str,
    duration: Option<i64>,
    color: Option<String>,
    repeat: Option<&str>,
) -> Result<()> {
    let start = parse_instant(start)?;
    let recurrence_days = match repeat {
        Some(days) => parse_repeat(days)?,
        None => Vec::new(),
    };

    let task = store.create(NewTask {
        title,
        color,
        start,
        duration_min: duration,
        recurrence_days,
        exception_dates: Vec::new(),
    })?;

    println!("created {} ({} at {})", task.id, task.title, task.start.format("%Y-%m-%d %H:%M"));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_edit(
    store: &JsonTaskStore,
    id: &str,
    title: Option<String>,
    start: Option<String>,
    duration: Option<i64>,
    color: Option<String>,
    repeat: Option<String>,
    clear_repeat: bool,
    except: Option<String>,
) -> Result<()> {
    let start = start.as_deref().map(parse_instant).transpose()?;

    let recurrence_days = if clear_repeat {
        Some(Vec::new())
    } else {
        repeat.as_deref().map(parse_repeat).transpose()?
    };

    // Adding an exception merges into the stored set rather than replacing.
    let exception_dates = match except {
        Some(date) => {
            let task = store
                .get(id)
                .ok_or_else(|| errors::TimeblockError::TaskNotFound(id.to_string()))?;
            let mut dates: Vec<DateKey> = task.exception_dates.into_iter().collect();
            dates.push(DateKey(parse_date(&date)?));
            Some(dates)
        }
        None => None,
    };

    let task = store.patch(
        id,
        TaskPatch { title, color, start, duration_min: duration, recurrence_days, exception_dates },
    )?;

    println!("updated {} ({})", task.id, task.title);
    Ok(())
}

fn cmd_rm(store: &JsonTaskStore, id: &str) -> Result<()> {
    store.delete(id)?;
    println!("deleted {id}");
    Ok(())
}

fn cmd_move(store: &JsonTaskStore, id: &str, date: &str, to: &str) -> Result<()> {
    let occurrence_date = parse_date(date)?;
    let target = parse_instant(to)?;

    match mutate::relocate(store, id, occurrence_date, target)? {
        Relocation::Moved(task) => {
            println!("moved {} to {}", task.id, task.start.format("%Y-%m-%d %H:%M"));
        }
        Relocation::SplitFromSeries { series, replacement } => {
            println!(
                "split {} out of {} for {}; new one-off {} at {}",
                replacement.title,
                series.id,
                occurrence_date.format("%Y-%m-%d"),
                replacement.id,
                replacement.start.format("%Y-%m-%d %H:%M"),
            );
        }
        Relocation::AddedInstance { series, instance } => {
            println!(
                "added one-off {} at {} (series {} unchanged)",
                instance.id,
                instance.start.format("%Y-%m-%d %H:%M"),
                series.id,
            );
        }
    }
    Ok(())
}

fn cmd_agenda(store: &JsonTaskStore, from: Option<&str>, days: i64) -> Result<()> {
    let first_day = match from {
        Some(date) => parse_date(date)?,
        None => WallClock.now().date(),
    };
    let window_start = first_day.and_time(chrono::NaiveTime::MIN);
    let window_end = window_start + chrono::Duration::days(days.max(1));

    let tasks = store.list_all();
    let occurrences = occurrence::expand(&tasks, window_start, window_end);

    if occurrences.is_empty() {
        println!("no occurrences between {first_day} and {}", window_end.date());
        return Ok(());
    }

    for occ in occurrences {
        println!(
            "{}  {}-{}  {}  [{}]",
            occ.start.format("%a %Y-%m-%d"),
            occ.start.format("%H:%M"),
            occ.end.format("%H:%M"),
            occ.task.title,
            occ.task.id,
        );
    }
    Ok(())
}

/// Cheap read snapshot of the active/next occurrence, printed for humans.
/// The same queries back the 1 Hz progress polling a UI would do.
fn cmd_status(store: &JsonTaskStore) -> Result<()> {
    let now = round_to_minute(WallClock.now());
    let tasks = store.list_all();

    match occurrence::find_active(&tasks, now) {
        Some(active) => {
            let elapsed = (now - active.start).num_minutes();
            let remaining = (active.end - now).num_minutes();
            println!(
                "active: {}  {}-{}  ({elapsed} min elapsed, {remaining} min remaining)",
                active.task.title,
                clock::format_clock(active.start),
                clock::format_clock(active.end),
            );
        }
        None => println!("active: none"),
    }

    match occurrence::find_next(&tasks, now) {
        Some(next) => {
            println!(
                "next:   {}  starts {} at {}",
                next.task.title,
                next.start.format("%a %Y-%m-%d"),
                clock::format_clock(next.start),
            );
        }
        None => println!("next:   none"),
    }
    Ok(())
}

fn round_to_minute(now: NaiveDateTime) -> NaiveDateTime {
    clock::day_start(now) + chrono::Duration::minutes(i64::from(clock::minutes_from_midnight(now)))
}
