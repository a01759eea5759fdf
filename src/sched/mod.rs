// src/sched/mod.rs

//! Scheduling core: transition warnings driven by a self-renewing timer set.
//!
//! This module ties together:
//! - the pure planner that maps (tasks, now) to a set of warnings with
//!   concrete fire instants
//! - the async runtime that arms one cancellable timer per warning plus an
//!   unconditional safety re-evaluation tick, and cancels the entire
//!   previous set on every rebuild
//!
//! The pure planning logic lives in [`plan`]; the async/IO shell is
//! implemented in [`runtime`].

use tokio::sync::mpsc;

pub mod plan;
pub mod runtime;

pub use plan::{plan_warnings, Warning, WarningKind};
pub use runtime::SchedulerRuntime;

/// Minutes before an occurrence boundary at which a warning fires.
pub const LEAD_MINUTES: i64 = 5;

/// Minimum desirable gap between consecutive occurrences, in minutes. A
/// smaller gap produces a short-break advisory.
pub const MIN_BREAK_MINUTES: i64 = 5;

/// Interval of the unconditional safety re-evaluation timer, in seconds.
/// This is what keeps a long-running process self-correcting: within one
/// interval the timer set converges on current data without any external
/// invalidation signal.
pub const SAFETY_INTERVAL_SECS: u64 = 60;

/// Events flowing into the scheduler runtime from timers, watchers and
/// mutation sites.
#[derive(Debug)]
pub enum SchedulerEvent {
    /// Cancel all pending warnings and re-plan against a fresh "now".
    Rebuild,
    /// An armed warning timer elapsed.
    WarningDue(Warning),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Cloneable handle for talking to a running [`SchedulerRuntime`].
///
/// Mutation sites call [`SchedulerHandle::rebuild`] right after writing the
/// store so warnings reflect the new data immediately instead of waiting
/// for the next safety tick.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerEvent>,
}

impl SchedulerHandle {
    pub(crate) fn new(tx: mpsc::Sender<SchedulerEvent>) -> Self {
        Self { tx }
    }

    /// Request an eager rebuild. A send failure means the runtime already
    /// exited, which is fine to ignore.
    pub async fn rebuild(&self) {
        let _ = self.tx.send(SchedulerEvent::Rebuild).await;
    }

    /// Request a graceful shutdown.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SchedulerEvent::ShutdownRequested).await;
    }
}
