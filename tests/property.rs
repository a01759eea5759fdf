// tests/property.rs

//! Property tests for the occurrence engine.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

use timeblock::occurrence::expand;
use timeblock::types::DateKey;
use timeblock_test_utils::builders::{date, dt, TaskBuilder};

proptest! {
    // A one-off task contributes exactly one occurrence when its interval
    // overlaps the window and zero otherwise, regardless of where the
    // window lies.
    #[test]
    fn one_off_expansion_matches_the_overlap_test(
        start_offset_min in -10_000i64..10_000,
        duration_min in 1u32..600,
        window_offset_min in -10_000i64..10_000,
        window_len_min in 1i64..10_000,
    ) {
        let base = dt(2026, 1, 5, 0, 0);
        let task = TaskBuilder::one_off("t", base + Duration::minutes(start_offset_min))
            .duration(duration_min)
            .build();

        let window_start = base + Duration::minutes(window_offset_min);
        let window_end = window_start + Duration::minutes(window_len_min);

        let occs = expand(std::slice::from_ref(&task), window_start, window_end);

        let overlaps = task.end() > window_start && task.start < window_end;
        prop_assert_eq!(occs.len(), usize::from(overlaps));
        if overlaps {
            prop_assert_eq!(occs[0].start, task.start);
            prop_assert_eq!(occs[0].end, task.end());
        }
    }

    // Every occurrence of a recurring series lands on a recurrence weekday,
    // never on an excepted date, never before the anchor date, always at
    // the anchor's time-of-day — and the count agrees with a day-by-day
    // reference walk from the anchor.
    #[test]
    fn recurring_expansion_respects_series_invariants(
        days in proptest::collection::btree_set(0u8..7, 1..4),
        anchor_offset_days in 0i64..20,
        window_len_days in 1i64..15,
        exception_offsets in proptest::collection::vec(0i64..30, 0..5),
    ) {
        let anchor_date = date(2026, 1, 1) + Duration::days(anchor_offset_days);
        let start = anchor_date.and_hms_opt(9, 15, 0).unwrap();

        let mut builder = TaskBuilder::recurring("series", start, &days.iter().copied().collect::<Vec<_>>())
            .duration(30);
        let mut exceptions: BTreeSet<NaiveDate> = BTreeSet::new();
        for off in &exception_offsets {
            let d = anchor_date + Duration::days(*off);
            exceptions.insert(d);
            builder = builder.except(d);
        }
        let task = builder.build();

        let window_start = dt(2026, 1, 1, 0, 0);
        let window_end = window_start + Duration::days(window_len_days);

        let occs = expand(std::slice::from_ref(&task), window_start, window_end);

        for occ in &occs {
            let d = occ.start.date();
            prop_assert!(days.contains(&(d.weekday().num_days_from_sunday() as u8)));
            prop_assert!(!task.exception_dates.contains(&DateKey(d)));
            prop_assert!(d >= anchor_date);
            prop_assert_eq!(occ.start.time(), start.time());
            prop_assert_eq!(occ.end - occ.start, Duration::minutes(30));
        }

        // Reference walk: enumerate candidate dates from the anchor forward
        // and count the occurrences whose interval overlaps the window.
        let mut expected = 0usize;
        let mut d = anchor_date;
        let horizon = window_end.date() + Duration::days(1);
        while d <= horizon {
            let on_weekday = days.contains(&(d.weekday().num_days_from_sunday() as u8));
            if on_weekday && !exceptions.contains(&d) {
                let occ_start = d.and_time(start.time());
                let occ_end = occ_start + Duration::minutes(30);
                if occ_end > window_start && occ_start < window_end {
                    expected += 1;
                }
            }
            d = d + Duration::days(1);
        }
        prop_assert_eq!(occs.len(), expected);
    }
}
