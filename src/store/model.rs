// src/store/model.rs

//! Task model types and input normalization.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::DateKey;

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

/// Display accent applied when a task is created without one.
pub const DEFAULT_COLOR: &str = "#0ea5e9";

/// A stored task definition: one-off, or weekly-recurring with exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (slug from title + 4 random hex chars). Immutable.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Display accent; carries no scheduling meaning.
    #[serde(default = "default_color")]
    pub color: String,
    /// Anchor instant. For a recurring task this fixes the time-of-day and
    /// the earliest date the series can generate an occurrence on.
    pub start: NaiveDateTime,
    /// Occurrence length in minutes; always positive.
    pub duration_min: u32,
    /// Weekday indices (0 = Sunday .. 6 = Saturday) the task repeats on.
    /// Empty means the task is a single one-off occurrence at `start`.
    #[serde(default)]
    pub recurrence_days: BTreeSet<u8>,
    /// Dates on which the recurring series generates nothing. Tolerated but
    /// meaningless on one-off tasks.
    #[serde(default)]
    pub exception_dates: BTreeSet<DateKey>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.recurrence_days.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_min))
    }

    /// End of the anchored occurrence: `start + duration`.
    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration()
    }

    /// Calendar date of the anchor instant. A recurring series never
    /// generates an occurrence before this date.
    pub fn anchor_date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Input for creating a task. Duration and weekday values are raw user
/// input here; the store normalizes them on write.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub color: Option<String>,
    pub start: NaiveDateTime,
    pub duration_min: Option<i64>,
    pub recurrence_days: Vec<i32>,
    pub exception_dates: Vec<DateKey>,
}

/// Partial update; `None` fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub color: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub duration_min: Option<i64>,
    pub recurrence_days: Option<Vec<i32>>,
    pub exception_dates: Option<Vec<DateKey>>,
}

/// Clamp a raw duration to a positive minute count, falling back to the
/// configured default when absent or non-positive.
pub(crate) fn normalize_duration(raw: Option<i64>, default_min: u32) -> u32 {
    match raw {
        Some(min) if min > 0 => u32::try_from(min).unwrap_or(default_min),
        _ => default_min,
    }
}

/// Keep only valid weekday indices (0..=6), deduplicated.
pub(crate) fn normalize_recurrence(raw: &[i32]) -> BTreeSet<u8> {
    raw.iter()
        .filter(|&&d| (0..=6).contains(&d))
        .map(|&d| d as u8)
        .collect()
}
