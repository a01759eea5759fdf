// src/sched/plan.rs

//! Pure warning planner.
//!
//! This module contains a synchronous, deterministic function that maps the
//! current task collection and a concrete "now" to the set of warnings the
//! runtime should arm. It has no channels, no Tokio types, and performs no
//! IO, so the whole transition logic is unit-testable without timers.

use chrono::{Duration, NaiveDateTime};

use crate::clock::format_clock;
use crate::notify::Notification;
use crate::occurrence::{find_active, find_next, find_previous};
use crate::store::Task;

use super::{LEAD_MINUTES, MIN_BREAK_MINUTES};

/// Which transition a warning announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The active occurrence ends in [`LEAD_MINUTES`].
    EndingSoon,
    /// The next occurrence starts in [`LEAD_MINUTES`].
    StartingSoon,
    /// The gap before the next occurrence is shorter than
    /// [`MIN_BREAK_MINUTES`].
    ShortBreak,
}

/// A planned warning: when to fire and what to deliver.
///
/// `fire_at` may already be in the past (a short-break advisory whose gap is
/// underway); the runtime delivers those immediately instead of arming a
/// timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub fire_at: NaiveDateTime,
    pub notification: Notification,
}

/// Compute the warnings to arm at `now`.
///
/// - If an occurrence is active and ends more than the lead time from now,
///   an ending-soon warning is planned at `end - lead`.
/// - If a next occurrence exists and starts more than the lead time from
///   now, a starting-soon warning is planned at `start - lead`.
/// - If the occurrence immediately preceding the next one leaves a gap
///   below the break threshold, a single short-break advisory is planned at
///   that occurrence's end (possibly already past).
///
/// The function is deterministic: calling it twice with unchanged inputs
/// yields the identical plan, which is what makes runtime rebuilds
/// idempotent.
pub fn plan_warnings(tasks: &[Task], now: NaiveDateTime) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let lead = Duration::minutes(LEAD_MINUTES);

    if let Some(active) = find_active(tasks, now) {
        let fire_at = active.end - lead;
        if fire_at > now {
            warnings.push(Warning {
                kind: WarningKind::EndingSoon,
                fire_at,
                notification: Notification::new(
                    "Task ending soon",
                    format!("{} ends in {LEAD_MINUTES} minutes.", active.task.title),
                ),
            });
        }
    }

    if let Some(next) = find_next(tasks, now) {
        let fire_at = next.start - lead;
        if fire_at > now {
            warnings.push(Warning {
                kind: WarningKind::StartingSoon,
                fire_at,
                notification: Notification::new(
                    "Upcoming task",
                    format!(
                        "{} starts in {LEAD_MINUTES} minutes ({}).",
                        next.task.title,
                        format_clock(next.start)
                    ),
                ),
            });
        }

        if let Some(prev) = find_previous(tasks, next.start) {
            let gap = next.start - prev.end;
            if gap < Duration::minutes(MIN_BREAK_MINUTES) {
                warnings.push(Warning {
                    kind: WarningKind::ShortBreak,
                    fire_at: prev.end,
                    notification: Notification::new(
                        "Short break detected",
                        format!(
                            "Less than {MIN_BREAK_MINUTES} minutes between tasks. \
                             Consider a short pause."
                        ),
                    ),
                });
            }
        }
    }

    warnings
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

    fn kinds(warnings: &[Warning]) -> Vec<WarningKind> {
        warnings.iter().map(|w| w.kind).collect()
    }

    #[test]
    fn no_tasks_means_no_warnings() {
        assert!(plan_warnings(&[], dt(2026, 1, 5, 9, 0)).is_empty());
    }

    #[test]
    fn active_task_gets_ending_warning_at_lead_time() {
        let tasks = vec![one_off("focus", dt(2026, 1, 5, 9, 0), 30)];
        let plan = plan_warnings(&tasks, dt(2026, 1, 5, 9, 10));

        assert_eq!(kinds(&plan), vec![WarningKind::EndingSoon]);
        assert_eq!(plan[0].fire_at, dt(2026, 1, 5, 9, 25));
        assert!(plan[0].notification.body.contains("focus"));
    }

    #[test]
    fn ending_warning_is_skipped_when_end_is_within_lead_time() {
        let tasks = vec![one_off("focus", dt(2026, 1, 5, 9, 0), 30)];
        // 9:26: less than five minutes remain, nothing worth arming.
        assert!(plan_warnings(&tasks, dt(2026, 1, 5, 9, 26)).is_empty());
        // Boundary: fire instant equal to now is not armed.
        assert!(plan_warnings(&tasks, dt(2026, 1, 5, 9, 25)).is_empty());
    }

    #[test]
    fn upcoming_task_gets_starting_warning_with_clock_time() {
        let tasks = vec![one_off("standup", dt(2026, 1, 5, 9, 0), 15)];
        let plan = plan_warnings(&tasks, dt(2026, 1, 5, 8, 0));

        assert_eq!(kinds(&plan), vec![WarningKind::StartingSoon]);
        assert_eq!(plan[0].fire_at, dt(2026, 1, 5, 8, 55));
        assert!(plan[0].notification.body.contains("09:00"));
    }

    #[test]
    fn short_gap_plans_break_advisory_at_previous_end() {
        // A runs 09:00-10:00, B starts 10:03: a 3-minute gap.
        let tasks = vec![
            one_off("a", dt(2026, 1, 5, 9, 0), 60),
            one_off("b", dt(2026, 1, 5, 10, 3), 30),
        ];
        let plan = plan_warnings(&tasks, dt(2026, 1, 5, 9, 0));

        assert!(plan.iter().any(|w| w.kind == WarningKind::ShortBreak
            && w.fire_at == dt(2026, 1, 5, 10, 0)));
    }

    #[test]
    fn comfortable_gap_plans_no_break_advisory() {
        let tasks = vec![
            one_off("a", dt(2026, 1, 5, 9, 0), 60),
            one_off("b", dt(2026, 1, 5, 10, 30), 30),
        ];
        let plan = plan_warnings(&tasks, dt(2026, 1, 5, 9, 0));
        assert!(plan.iter().all(|w| w.kind != WarningKind::ShortBreak));
    }

    #[test]
    fn break_advisory_in_progress_fires_in_the_past() {
        // Now is inside the 3-minute gap: the advisory instant has passed
        // and the runtime is expected to deliver it immediately.
        let tasks = vec![
            one_off("a", dt(2026, 1, 5, 9, 0), 60),
            one_off("b", dt(2026, 1, 5, 10, 3), 30),
        ];
        let now = dt(2026, 1, 5, 10, 1);
        let plan = plan_warnings(&tasks, now);

        let advisory = plan.iter().find(|w| w.kind == WarningKind::ShortBreak).unwrap();
        assert!(advisory.fire_at <= now);
    }

    #[test]
    fn planning_is_deterministic() {
        let tasks = vec![
            one_off("a", dt(2026, 1, 5, 9, 0), 60),
            one_off("b", dt(2026, 1, 5, 10, 3), 30),
        ];
        let now = dt(2026, 1, 5, 9, 0);
        assert_eq!(plan_warnings(&tasks, now), plan_warnings(&tasks, now));
    }
}
