use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use timeblock::notify::{Notification, NotifySink};

/// A fake sink that records every delivered notification.
pub struct FakeSink {
    delivered: Arc<Mutex<Vec<Notification>>>,
}

impl FakeSink {
    pub fn new(delivered: Arc<Mutex<Vec<Notification>>>) -> Self {
        Self { delivered }
    }
}

impl NotifySink for FakeSink {
    fn deliver(&mut self, note: Notification) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        let delivered = Arc::clone(&self.delivered);

        Box::pin(async move {
            delivered.lock().unwrap().push(note);
        })
    }
}
