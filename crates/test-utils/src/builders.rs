use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use timeblock::store::{Task, DEFAULT_COLOR};
use timeblock::types::DateKey;

/// Shorthand for a local instant in tests.
pub fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid test date")
        .and_hms_opt(h, min, 0)
        .expect("valid test time")
}

/// Shorthand for a calendar date in tests.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Builder for `Task` values to simplify engine/planner test setup.
///
/// The name doubles as id and title so assertions can refer to tasks by a
/// single short string.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn one_off(name: &str, start: NaiveDateTime) -> Self {
        Self {
            task: Task {
                id: name.to_string(),
                title: name.to_string(),
                color: DEFAULT_COLOR.to_string(),
                start,
                duration_min: 30,
                recurrence_days: BTreeSet::new(),
                exception_dates: BTreeSet::new(),
            },
        }
    }

    pub fn recurring(name: &str, start: NaiveDateTime, days: &[u8]) -> Self {
        let mut builder = Self::one_off(name, start);
        builder.task.recurrence_days = days.iter().copied().collect();
        builder
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.task.duration_min = minutes;
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.task.color = color.to_string();
        self
    }

    pub fn except(mut self, date: NaiveDate) -> Self {
        self.task.exception_dates.insert(DateKey(date));
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
