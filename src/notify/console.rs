// src/notify/console.rs

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use tracing::{debug, info};

use super::{Notification, NotifySink};

/// Console delivery: rings the terminal bell and prints the message to
/// stdout. With the silent flag set, nothing is emitted at all (the bell
/// included) and the warning is only visible at debug log level.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    silent: bool,
}

impl ConsoleSink {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }
}

impl NotifySink for ConsoleSink {
    fn deliver(&mut self, note: Notification) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let silent = self.silent;
        Box::pin(async move {
            if silent {
                debug!(title = %note.title, "silent mode; suppressing notification");
                return;
            }

            info!(title = %note.title, body = %note.body, "delivering notification");

            // BEL + message. A failed write (e.g. closed stdout) is not the
            // scheduler's problem.
            let mut out = std::io::stdout();
            if writeln!(out, "\u{7}[{}] {}", note.title, note.body).is_err() {
                debug!("notification write failed; ignoring");
            }
        })
    }
}
