// src/store/json.rs

//! Whole-document JSON task store.
//!
//! The collection is a single JSON array on disk. Every mutation is a
//! read-modify-write of the whole document (one writer, last writer wins),
//! which is the atomicity contract the scheduler relies on. The read path
//! validates record-by-record: a malformed entry is dropped with a warning
//! and never reaches the occurrence engine.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::errors::{Result, TimeblockError};
use crate::occurrence;
use crate::store::id::generate_task_id;
use crate::store::model::{
    normalize_duration, normalize_recurrence, NewTask, Task, TaskPatch, DEFAULT_COLOR,
};

/// File-backed task store.
///
/// The struct itself is stateless (path + defaults), so clones are cheap and
/// every reader sees the latest written document.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
    default_duration_min: u32,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>, default_duration_min: u32) -> Self {
        Self { path: path.into(), default_duration_min }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All well-formed tasks in the document.
    ///
    /// A missing document is an empty collection. Records that fail to
    /// deserialize are dropped with a warning; a zero duration (possible via
    /// hand-edited documents) is normalized back to the configured default.
    pub fn list_all(&self) -> Vec<Task> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "failed to read task store; treating as empty");
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "task store is not a JSON array; treating as empty");
                return Vec::new();
            }
        };

        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Task>(value) {
                Ok(task) if task.title.trim().is_empty() => {
                    warn!(task = %task.id, "dropping task with empty title");
                    None
                }
                Ok(mut task) => {
                    if task.duration_min == 0 {
                        warn!(task = %task.id, "zero duration in stored task; normalizing");
                        task.duration_min = self.default_duration_min;
                    }
                    Some(task)
                }
                Err(e) => {
                    warn!(error = %e, "dropping malformed task record");
                    None
                }
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.list_all().into_iter().find(|t| t.id == id)
    }

    /// Create a task, assigning a fresh id and normalizing the input.
    pub fn create(&self, new: NewTask) -> Result<Task> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(TimeblockError::InvalidInput("task title must not be empty".to_string()));
        }

        let task = Task {
            id: generate_task_id(&title),
            title,
            color: new.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            start: new.start,
            duration_min: normalize_duration(new.duration_min, self.default_duration_min),
            recurrence_days: normalize_recurrence(&new.recurrence_days),
            exception_dates: new.exception_dates.into_iter().collect(),
        };

        let mut tasks = self.list_all();
        tasks.push(task.clone());
        self.save(&tasks)?;
        warn_on_overlap(&tasks, &task);
        debug!(task = %task.id, start = %task.start, "created task");
        Ok(task)
    }

    /// Merge the provided fields over the stored record.
    ///
    /// Omitted fields keep their values. Invalid field values are normalized
    /// (empty title and non-positive duration keep the stored value) rather
    /// than rejected. Unknown ids report [`TimeblockError::TaskNotFound`].
    pub fn patch(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let mut tasks = self.list_all();
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Err(TimeblockError::TaskNotFound(id.to_string()));
        };

        if let Some(title) = patch.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                warn!(task = %task.id, "ignoring empty title in patch");
            } else {
                task.title = title;
            }
        }
        if let Some(color) = patch.color {
            task.color = color;
        }
        if let Some(start) = patch.start {
            task.start = start;
        }
        if let Some(raw) = patch.duration_min {
            if raw > 0 {
                task.duration_min = u32::try_from(raw).unwrap_or(task.duration_min);
            }
        }
        if let Some(days) = patch.recurrence_days {
            task.recurrence_days = normalize_recurrence(&days);
        }
        if let Some(dates) = patch.exception_dates {
            task.exception_dates = dates.into_iter().collect();
        }

        let updated = task.clone();
        self.save(&tasks)?;
        warn_on_overlap(&tasks, &updated);
        debug!(task = %updated.id, "patched task");
        Ok(updated)
    }

    /// Remove a task. Unknown ids are a no-op, not an error.
    pub fn delete(&self, id: &str) -> Result<()> {
        let tasks = self.list_all();
        let remaining: Vec<Task> = tasks.into_iter().filter(|t| t.id != id).collect();
        self.save(&remaining)?;
        debug!(task = %id, "deleted task (if it existed)");
        Ok(())
    }

    /// Tasks whose anchored interval `[start, end)` overlaps the half-open
    /// window. Recurring materialization is the occurrence engine's job;
    /// this is the raw record-level range query.
    pub fn tasks_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Task> {
        self.list_all()
            .into_iter()
            .filter(|t| t.end() > start && t.start < end)
            .collect()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Flag (never reject) overlapping occurrences at the data-entry boundary.
///
/// Overlaps are a user data error; the scheduler resolves them with the
/// documented earliest-start tie-break, but surfacing them here makes the
/// bad state visible at the moment it is created.
fn warn_on_overlap(tasks: &[Task], task: &Task) {
    let window_start = task.start - Duration::hours(24);
    let window_end = task.end() + Duration::hours(24);
    for occ in occurrence::expand(tasks, window_start, window_end) {
        if occ.task.id != task.id && occ.start < task.end() && occ.end > task.start {
            warn!(
                task = %task.id,
                other = %occ.task.id,
                "task overlaps an existing occurrence; active-task queries use earliest start"
            );
            return;
        }
    }
}
