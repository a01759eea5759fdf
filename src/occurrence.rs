// src/occurrence.rs

//! Occurrence engine: expands stored task definitions into concrete
//! time-stamped occurrences over a window.
//!
//! Occurrences are derived and ephemeral. They are recomputed on every
//! query, never cached and never persisted, so edits, deletions and new
//! exceptions are reflected by the very next expansion.

use chrono::{Duration, NaiveDateTime};

use crate::clock::{add_days, weekday_index};
use crate::store::Task;
use crate::types::DateKey;

/// Half-width of the window used to look for the active occurrence. Wide
/// enough to catch occurrences spanning midnight and multi-hour tasks.
const ACTIVE_WINDOW_HOURS: i64 = 24;

/// How far ahead `find_next` looks.
const LOOKAHEAD_DAYS: i64 = 7;

/// How far back `find_previous` looks.
const LOOKBACK_DAYS: i64 = 7;

/// One concrete, time-bounded instance of a task on a specific date.
///
/// For a recurring task the identity for display/edit purposes is still the
/// parent task's id; the concrete `start` pins it to one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub task: Task,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Expand every task into its occurrences overlapping the half-open window
/// `[window_start, window_end)`, sorted ascending by start instant with ties
/// broken by task id for determinism.
///
/// One-off tasks contribute their anchored interval when it overlaps the
/// window; their own exception list never suppresses them (a one-off split
/// off a series may carry a stale copy). Recurring tasks contribute one
/// occurrence per matching weekday from their anchor date onward, skipping
/// excepted dates, at the anchor's time-of-day.
pub fn expand(tasks: &[Task], window_start: NaiveDateTime, window_end: NaiveDateTime) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    if window_end <= window_start {
        return occurrences;
    }

    for task in tasks {
        if !task.is_recurring() {
            let (start, end) = (task.start, task.end());
            if end > window_start && start < window_end {
                occurrences.push(Occurrence { task: task.clone(), start, end });
            }
            continue;
        }

        let mut day = window_start.date().max(task.anchor_date());
        let last = window_end.date();
        while day <= last {
            if task.recurrence_days.contains(&weekday_index(day))
                && !task.exception_dates.contains(&DateKey(day))
            {
                let start = day.and_time(task.start.time());
                let end = start + task.duration();
                if end > window_start && start < window_end {
                    occurrences.push(Occurrence { task: task.clone(), start, end });
                }
            }
            day = add_days(day, 1);
        }
    }

    occurrences.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.task.id.cmp(&b.task.id)));
    occurrences
}

/// The occurrence containing `now` (`start <= now < end`), if any.
///
/// Overlapping tasks are a user data error; when several occurrences
/// contain `now`, the earliest start (then smallest id) wins.
pub fn find_active(tasks: &[Task], now: NaiveDateTime) -> Option<Occurrence> {
    let half = Duration::hours(ACTIVE_WINDOW_HOURS);
    expand(tasks, now - half, now + half)
        .into_iter()
        .find(|occ| occ.start <= now && now < occ.end)
}

/// The earliest occurrence starting strictly after `now`, within a
/// seven-day lookahead.
pub fn find_next(tasks: &[Task], now: NaiveDateTime) -> Option<Occurrence> {
    expand(tasks, now, now + Duration::days(LOOKAHEAD_DAYS))
        .into_iter()
        .find(|occ| occ.start > now)
}

/// The latest occurrence starting strictly before `before`, within a
/// seven-day lookback.
pub fn find_previous(tasks: &[Task], before: NaiveDateTime) -> Option<Occurrence> {
    expand(tasks, before - Duration::days(LOOKBACK_DAYS), before)
        .into_iter()
        .rev()
        .find(|occ| occ.start < before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn one_off(id: &str, start: NaiveDateTime, duration_min: u32) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            color: crate::store::DEFAULT_COLOR.to_string(),
            start,
            duration_min,
            recurrence_days: BTreeSet::new(),
            exception_dates: BTreeSet::new(),
        }
    }

    #[test]
    fn empty_window_yields_nothing() {
        let tasks = vec![one_off("a", dt(2026, 1, 5, 9, 0), 30)];
        assert!(expand(&tasks, dt(2026, 1, 5, 10, 0), dt(2026, 1, 5, 10, 0)).is_empty());
        assert!(expand(&tasks, dt(2026, 1, 5, 10, 0), dt(2026, 1, 5, 9, 0)).is_empty());
    }

    #[test]
    fn ties_are_broken_by_task_id() {
        let tasks = vec![
            one_off("b", dt(2026, 1, 5, 9, 0), 30),
            one_off("a", dt(2026, 1, 5, 9, 0), 30),
        ];
        let occs = expand(&tasks, dt(2026, 1, 5, 0, 0), dt(2026, 1, 6, 0, 0));
        assert_eq!(occs[0].task.id, "a");
        assert_eq!(occs[1].task.id, "b");
    }

    #[test]
    fn recurring_occurrence_copies_time_of_day() {
        let mut task = one_off("standup", dt(2026, 1, 5, 9, 15), 15);
        task.recurrence_days = [1u8, 3].into_iter().collect();

        let occs = expand(&[task], dt(2026, 1, 7, 0, 0), dt(2026, 1, 8, 0, 0));
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].start, dt(2026, 1, 7, 9, 15));
        assert_eq!(occs[0].end, dt(2026, 1, 7, 9, 30));
    }

    #[test]
    fn active_occurrence_spanning_midnight_is_found() {
        let task = one_off("late", dt(2026, 1, 5, 23, 30), 60);
        let active = find_active(&[task], dt(2026, 1, 6, 0, 15)).unwrap();
        assert_eq!(active.task.id, "late");
    }

    #[test]
    fn overlapping_actives_resolve_to_earliest_start() {
        let tasks = vec![
            one_off("later", dt(2026, 1, 5, 9, 15), 60),
            one_off("earlier", dt(2026, 1, 5, 9, 0), 60),
        ];
        let active = find_active(&tasks, dt(2026, 1, 5, 9, 30)).unwrap();
        assert_eq!(active.task.id, "earlier");
    }

    #[test]
    fn find_previous_returns_latest_before_instant() {
        let tasks = vec![
            one_off("a", dt(2026, 1, 5, 8, 0), 30),
            one_off("b", dt(2026, 1, 5, 9, 0), 30),
        ];
        let prev = find_previous(&tasks, dt(2026, 1, 5, 10, 0)).unwrap();
        assert_eq!(prev.task.id, "b");
        assert!(find_previous(&tasks, dt(2026, 1, 5, 8, 0)).is_none());
    }
}
