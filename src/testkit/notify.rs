//! Recording notifier for asserting on emitted events.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::port::notifier::{Event, Notifier};

/// Captures every event it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the captured events, usable after the notifier is
    /// boxed into a registry.
    #[must_use]
    pub fn events_handle(&self) -> Arc<Mutex<Vec<Event>>> {
        self.events.clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
