// src/sched/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::NaiveDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::Result;
use crate::notify::NotifySink;
use crate::sched::plan::plan_warnings;
use crate::sched::{SchedulerEvent, SchedulerHandle, SAFETY_INTERVAL_SECS};
use crate::store::JsonTaskStore;

/// Async shell around the pure planner.
///
/// Owns the single outstanding timer set: one abortable task per planned
/// warning plus the safety re-evaluation tick. Every rebuild aborts the
/// *entire* previous set before arming the new one, so stacked rebuilds can
/// never produce duplicate or stale alerts — the core correctness property
/// of the scheduler.
pub struct SchedulerRuntime<S: NotifySink> {
    store: JsonTaskStore,
    sink: S,
    clock: Arc<dyn Clock>,
    event_tx: mpsc::Sender<SchedulerEvent>,
    event_rx: mpsc::Receiver<SchedulerEvent>,
    pending: Vec<JoinHandle<()>>,
}

impl<S: NotifySink> fmt::Debug for SchedulerRuntime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerRuntime")
            .field("store", &self.store)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<S: NotifySink> SchedulerRuntime<S> {
    /// Construct a runtime and the handle used to poke it from mutation
    /// sites and watchers.
    pub fn new(store: JsonTaskStore, sink: S, clock: Arc<dyn Clock>) -> (Self, SchedulerHandle) {
        let (event_tx, event_rx) = mpsc::channel::<SchedulerEvent>(64);
        let handle = SchedulerHandle::new(event_tx.clone());
        let runtime = Self { store, sink, clock, event_tx, event_rx, pending: Vec::new() };
        (runtime, handle)
    }

    /// Main event loop.
    ///
    /// Performs an initial rebuild, then reacts to rebuild requests, due
    /// warnings and shutdown. Delivery is fire-and-forget: the sink's
    /// outcome is never consulted.
    pub async fn run(mut self) -> Result<()> {
        info!("timeblock scheduler started");

        let now = self.clock.now();
        self.rebuild(now).await;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("scheduler event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "scheduler received event");

            match event {
                SchedulerEvent::Rebuild => {
                    let now = self.clock.now();
                    self.rebuild(now).await;
                }
                SchedulerEvent::WarningDue(warning) => {
                    self.sink.deliver(warning.notification).await;
                }
                SchedulerEvent::ShutdownRequested => {
                    info!("shutdown requested; cancelling pending warnings");
                    self.cancel_pending();
                    break;
                }
            }
        }

        info!("scheduler exiting");
        Ok(())
    }

    /// Cancel the entire pending timer set, re-plan against `now`, and arm
    /// the fresh set.
    ///
    /// Warnings whose fire instant has already passed (a short-break gap in
    /// progress) are delivered immediately, once per rebuild. The safety
    /// tick is re-armed unconditionally so the runtime converges on current
    /// data within one interval even if no one requests a rebuild.
    async fn rebuild(&mut self, now: NaiveDateTime) {
        self.cancel_pending();

        let tasks = self.store.list_all();
        let warnings = plan_warnings(&tasks, now);
        debug!(tasks = tasks.len(), warnings = warnings.len(), %now, "rebuilt warning plan");

        for warning in warnings {
            if warning.fire_at <= now {
                self.sink.deliver(warning.notification).await;
                continue;
            }

            let delay = (warning.fire_at - now).to_std().unwrap_or(StdDuration::ZERO);
            let tx = self.event_tx.clone();
            self.pending.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(SchedulerEvent::WarningDue(warning)).await;
            }));
        }

        let tx = self.event_tx.clone();
        self.pending.push(tokio::spawn(async move {
            tokio::time::sleep(StdDuration::from_secs(SAFETY_INTERVAL_SECS)).await;
            let _ = tx.send(SchedulerEvent::Rebuild).await;
        }));
    }

    fn cancel_pending(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}
