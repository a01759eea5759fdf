// src/config/mod.rs

//! Configuration loading and validation.

pub mod loader;
pub mod model;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, NotifySection, RawConfigFile, StoreSection, TasksSection};
