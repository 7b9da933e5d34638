//! Notifier port for operational events.

use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::MergeSummary;

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A circuit transitioned to open. Emitted once per open episode.
    CircuitOpened {
        key: String,
        failures: u32,
        cooldown: Duration,
    },
    /// A circuit closed (recovered or auto-reset).
    CircuitClosed { key: String },
    /// A publish run completed and the merged list was rendered.
    PicksPublished {
        date: NaiveDate,
        summary: MergeSummary,
    },
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe and return quickly; slow delivery
/// belongs in a spawned task.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A no-op notifier for tests or disabled alerting.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// Logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::CircuitOpened {
                key,
                failures,
                cooldown,
            } => {
                warn!(
                    key = %key,
                    failures,
                    cooldown_secs = cooldown.as_secs(),
                    "Circuit opened"
                );
            }
            Event::CircuitClosed { key } => {
                info!(key = %key, "Circuit closed");
            }
            Event::PicksPublished { date, summary } => {
                info!(
                    date = %date,
                    total = summary.total,
                    new = summary.new,
                    dropped = summary.dropped,
                    manual = summary.manual,
                    "Picks published"
                );
            }
        }
    }
}
