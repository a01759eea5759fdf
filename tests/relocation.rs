// tests/relocation.rs

//! Relocation semantics against a real (temp-dir) store: one-offs move in
//! place, same-date recurring moves split the series, cross-date recurring
//! moves add an instance and leave the series alone.

use tempfile::TempDir;
use timeblock::mutate::{relocate, Relocation};
use timeblock::occurrence::expand;
use timeblock::store::{JsonTaskStore, NewTask, Task};
use timeblock::types::DateKey;
use timeblock_test_utils::builders::{date, dt};

fn test_store() -> (TempDir, JsonTaskStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonTaskStore::new(dir.path().join("tasks.json"), 30);
    (dir, store)
}

fn create_standup(store: &JsonTaskStore) -> Task {
    // Mon/Wed series anchored Monday 2026-01-05 at 09:00, 15 minutes.
    store
        .create(NewTask {
            title: "Standup".to_string(),
            start: dt(2026, 1, 5, 9, 0),
            duration_min: Some(15),
            recurrence_days: vec![1, 3],
            ..NewTask::default()
        })
        .unwrap()
}

#[test]
fn one_off_tasks_are_truly_moved() {
    let (_dir, store) = test_store();
    let task = store
        .create(NewTask {
            title: "Focus".to_string(),
            start: dt(2026, 1, 5, 9, 0),
            duration_min: Some(45),
            ..NewTask::default()
        })
        .unwrap();

    let outcome = relocate(&store, &task.id, date(2026, 1, 5), dt(2026, 1, 6, 14, 0)).unwrap();

    let Relocation::Moved(moved) = outcome else {
        panic!("expected Moved");
    };
    assert_eq!(moved.id, task.id);
    assert_eq!(moved.start, dt(2026, 1, 6, 14, 0));
    assert_eq!(moved.duration_min, 45);
    assert_eq!(store.list_all().len(), 1);
}

#[test]
fn same_date_move_of_a_recurring_occurrence_splits_the_series() {
    let (_dir, store) = test_store();
    let series = create_standup(&store);

    // Drag Wednesday's occurrence from 09:00 to 11:02 on the same date.
    let outcome = relocate(&store, &series.id, date(2026, 1, 7), dt(2026, 1, 7, 11, 2)).unwrap();

    let Relocation::SplitFromSeries { series: patched, replacement } = outcome else {
        panic!("expected SplitFromSeries");
    };

    // The series is unchanged except for exactly one new exception date.
    assert_eq!(patched.id, series.id);
    assert_eq!(patched.start, series.start);
    assert_eq!(patched.recurrence_days, series.recurrence_days);
    let exceptions: Vec<_> = patched.exception_dates.iter().copied().collect();
    assert_eq!(exceptions, vec![DateKey(date(2026, 1, 7))]);

    // The replacement is a snapped one-off clone with a clean slate.
    assert_eq!(replacement.title, "Standup");
    assert_eq!(replacement.start, dt(2026, 1, 7, 11, 0));
    assert_eq!(replacement.duration_min, 15);
    assert!(!replacement.is_recurring());
    assert!(replacement.exception_dates.is_empty());
    assert_ne!(replacement.id, series.id);

    assert_eq!(store.list_all().len(), 2);

    // Net effect on the calendar: Wednesday 09:00 is gone, Wednesday 11:00
    // exists, Monday is untouched.
    let occs = expand(&store.list_all(), dt(2026, 1, 5, 0, 0), dt(2026, 1, 12, 0, 0));
    let starts: Vec<_> = occs.iter().map(|o| o.start).collect();
    assert_eq!(starts, vec![dt(2026, 1, 5, 9, 0), dt(2026, 1, 7, 11, 0)]);
}

#[test]
fn cross_date_move_of_a_recurring_occurrence_adds_an_instance() {
    let (_dir, store) = test_store();
    let series = create_standup(&store);

    // Drag Wednesday's occurrence to Thursday 10:00.
    let outcome = relocate(&store, &series.id, date(2026, 1, 7), dt(2026, 1, 8, 10, 0)).unwrap();

    let Relocation::AddedInstance { series: untouched, instance } = outcome else {
        panic!("expected AddedInstance");
    };

    // The series is completely unchanged, exceptions included.
    assert_eq!(untouched, series);
    assert_eq!(store.get(&series.id).unwrap(), series);

    assert_eq!(instance.start, dt(2026, 1, 8, 10, 0));
    assert!(!instance.is_recurring());

    // Wednesday's occurrence keeps firing from the series, and Thursday
    // gains the extra instance.
    let occs = expand(&store.list_all(), dt(2026, 1, 5, 0, 0), dt(2026, 1, 12, 0, 0));
    let starts: Vec<_> = occs.iter().map(|o| o.start).collect();
    assert_eq!(
        starts,
        vec![dt(2026, 1, 5, 9, 0), dt(2026, 1, 7, 9, 0), dt(2026, 1, 8, 10, 0)]
    );
}

#[test]
fn same_date_move_is_idempotent_on_the_exception_list() {
    let (_dir, store) = test_store();
    let series = create_standup(&store);

    relocate(&store, &series.id, date(2026, 1, 7), dt(2026, 1, 7, 11, 0)).unwrap();
    // Moving another (hypothetical) occurrence of the same date again must
    // not duplicate the exception entry.
    let outcome = relocate(&store, &series.id, date(2026, 1, 7), dt(2026, 1, 7, 13, 0)).unwrap();

    let Relocation::SplitFromSeries { series: patched, .. } = outcome else {
        panic!("expected SplitFromSeries");
    };
    assert_eq!(patched.exception_dates.len(), 1);
}
