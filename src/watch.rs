// src/watch.rs

//! Store-document watcher.
//!
//! Companion CLI invocations (add/edit/rm/move) write the store from a
//! separate process. The daemon watches the document so those writes
//! trigger an eager rebuild within the same tick, instead of waiting for
//! the next safety interval. Redundant change events are harmless: rebuild
//! is idempotent.

use std::path::PathBuf;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info};

use crate::sched::SchedulerHandle;

/// Handle for the store watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct StoreWatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for StoreWatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreWatcherHandle").finish()
    }
}

/// Spawn a watcher on the store document's directory that requests a
/// scheduler rebuild whenever the document changes.
///
/// The parent directory is watched (non-recursively) rather than the file
/// itself: whole-document writes replace the file, which would otherwise
/// detach an inode-based watch.
pub fn spawn_store_watcher(
    store_path: impl Into<PathBuf>,
    scheduler: SchedulerHandle,
) -> Result<StoreWatcherHandle> {
    let store_path: PathBuf = store_path.into();
    let store_path = store_path.canonicalize().unwrap_or(store_path);

    let dir = match store_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = store_path.file_name().map(std::ffi::OsStr::to_os_string);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // A send failure means the daemon is shutting down.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                eprintln!("timeblock: store watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    info!("store watcher started on {:?}", dir);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let touches_store = event
                .paths
                .iter()
                .any(|p| p.file_name() == file_name.as_deref());
            if touches_store {
                debug!("store document changed; requesting rebuild");
                scheduler.rebuild().await;
            }
        }
        debug!("store watcher event loop finished");
    });

    Ok(StoreWatcherHandle { _inner: watcher })
}
