// src/notify/mod.rs

//! Pluggable notification sink abstraction.
//!
//! The scheduler talks to a `NotifySink` instead of any concrete delivery
//! mechanism. Delivery is fire-and-forget: the sink swallows its own
//! failures (permission problems, closed pipes, silenced output) and the
//! scheduler proceeds as though delivery succeeded either way.
//!
//! - [`ConsoleSink`] is the default implementation: a terminal bell plus a
//!   printed line, suppressed entirely in silent mode.
//! - Tests can provide their own `NotifySink` that records deliveries.

use std::future::Future;
use std::pin::Pin;

pub mod console;

pub use console::ConsoleSink;

/// A title/body pair handed to the sink. The scheduler never learns whether
/// it was actually seen or heard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// Trait abstracting how warnings are delivered.
pub trait NotifySink: Send {
    /// Deliver a notification, best-effort. No result is surfaced.
    fn deliver(&mut self, note: Notification) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}
