// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::errors::TimeblockError;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [store]
/// path = "timeblock-tasks.json"
///
/// [notify]
/// silent = false
///
/// [tasks]
/// default_duration_min = 30
/// ```
///
/// All sections are optional and have reasonable defaults; a missing config
/// file altogether means "all defaults".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Store location from `[store]`.
    #[serde(default)]
    pub store: StoreSection,

    /// Delivery behaviour from `[notify]`.
    #[serde(default)]
    pub notify: NotifySection,

    /// Task input defaults from `[tasks]`.
    #[serde(default)]
    pub tasks: TasksSection,
}

/// Validated configuration used by the rest of the application.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub store: StoreSection,
    pub notify: NotifySection,
    pub tasks: TasksSection,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            store: StoreSection::default(),
            notify: NotifySection::default(),
            tasks: TasksSection::default(),
        }
    }
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TimeblockError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        if raw.tasks.default_duration_min == 0 {
            return Err(TimeblockError::ConfigError(
                "tasks.default_duration_min must be at least 1".to_string(),
            ));
        }
        Ok(Self { store: raw.store, notify: raw.notify, tasks: raw.tasks })
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Path of the JSON task document.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("timeblock-tasks.json")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

/// `[notify]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotifySection {
    /// Suppress all delivery (warnings still get planned and logged at
    /// debug level).
    #[serde(default)]
    pub silent: bool,
}

/// `[tasks]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TasksSection {
    /// Duration applied when a task is created without a valid one.
    #[serde(default = "default_duration_min")]
    pub default_duration_min: u32,
}

fn default_duration_min() -> u32 {
    30
}

impl Default for TasksSection {
    fn default() -> Self {
        Self { default_duration_min: default_duration_min() }
    }
}
