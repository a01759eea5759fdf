// src/mutate.rs

//! Relocation policy for edits and drags.
//!
//! Moving an occurrence means different things depending on what generated
//! it:
//!
//! - a one-off task is truly moved (its `start` is patched in place);
//! - a recurring occurrence moved within its own calendar date splits out
//!   of the series: the series gains an exception for that date and a
//!   one-off replacement is created at the new instant;
//! - a recurring occurrence moved to a different calendar date leaves the
//!   series completely untouched (the original date keeps firing) and adds
//!   an extra one-off instance at the target.
//!
//! Target instants are snapped to the 5-minute grid before anything is
//! written. Callers must trigger a scheduler rebuild after a successful
//! relocation; in the daemon the store watcher covers out-of-process writes.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::clock::snap_to_grid;
use crate::errors::{Result, TimeblockError};
use crate::store::{JsonTaskStore, NewTask, Task, TaskPatch};
use crate::types::DateKey;

/// What a relocation did to the store.
#[derive(Debug, Clone)]
pub enum Relocation {
    /// A one-off task was moved in place.
    Moved(Task),
    /// A same-date move of a recurring occurrence: the series gained an
    /// exception for the original date and a one-off replacement was
    /// created at the new instant.
    SplitFromSeries { series: Task, replacement: Task },
    /// A cross-date move of a recurring occurrence: the series is untouched
    /// and an extra one-off instance was created.
    AddedInstance { series: Task, instance: Task },
}

/// Relocate the occurrence of task `id` that falls on `occurrence_date` to
/// a new start instant.
///
/// `occurrence_date` is the calendar date the dragged occurrence originally
/// occupied; for a recurring task it decides whether the move splits the
/// series (same date) or adds an instance (different date). Returns
/// [`TimeblockError::TaskNotFound`] for unknown ids.
pub fn relocate(
    store: &JsonTaskStore,
    id: &str,
    occurrence_date: NaiveDate,
    target: NaiveDateTime,
) -> Result<Relocation> {
    let task = store
        .get(id)
        .ok_or_else(|| TimeblockError::TaskNotFound(id.to_string()))?;
    let new_start = snap_to_grid(target);

    if !task.is_recurring() {
        let moved = store.patch(id, TaskPatch { start: Some(new_start), ..TaskPatch::default() })?;
        info!(task = %moved.id, start = %new_start, "moved one-off task");
        return Ok(Relocation::Moved(moved));
    }

    // A split-off instance starts with a clean slate: the parent's
    // exception list is meaningless on a one-off.
    let clone = NewTask {
        title: task.title.clone(),
        color: Some(task.color.clone()),
        start: new_start,
        duration_min: Some(i64::from(task.duration_min)),
        recurrence_days: Vec::new(),
        exception_dates: Vec::new(),
    };

    if occurrence_date == new_start.date() {
        let key = DateKey(occurrence_date);
        let mut exceptions: Vec<DateKey> = task.exception_dates.iter().copied().collect();
        if !exceptions.contains(&key) {
            exceptions.push(key);
        }
        let series = store.patch(
            id,
            TaskPatch { exception_dates: Some(exceptions), ..TaskPatch::default() },
        )?;
        let replacement = store.create(clone)?;
        info!(
            series = %series.id,
            replacement = %replacement.id,
            date = %key,
            "split occurrence out of recurring series"
        );
        Ok(Relocation::SplitFromSeries { series, replacement })
    } else {
        let instance = store.create(clone)?;
        info!(
            series = %task.id,
            instance = %instance.id,
            "added one-off instance from cross-date move"
        );
        Ok(Relocation::AddedInstance { series: task, instance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn test_store() -> (TempDir, JsonTaskStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonTaskStore::new(dir.path().join("tasks.json"), 30);
        (dir, store)
    }

    #[test]
    fn relocating_unknown_task_reports_not_found() {
        let (_dir, store) = test_store();
        let err = relocate(
            &store,
            "missing-0000",
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            dt(2026, 1, 5, 10, 0),
        )
        .unwrap_err();
        assert!(matches!(err, TimeblockError::TaskNotFound(_)));
    }

    #[test]
    fn target_instants_are_snapped_before_commit() {
        let (_dir, store) = test_store();
        let task = store
            .create(NewTask {
                title: "Focus".to_string(),
                start: dt(2026, 1, 5, 9, 0),
                ..NewTask::default()
            })
            .unwrap();

        let outcome =
            relocate(&store, &task.id, dt(2026, 1, 5, 9, 0).date(), dt(2026, 1, 5, 10, 57)).unwrap();
        match outcome {
            Relocation::Moved(moved) => assert_eq!(moved.start, dt(2026, 1, 5, 10, 55)),
            other => panic!("expected Moved, got {other:?}"),
        }
    }
}
