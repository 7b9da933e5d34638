//! Circuit breaker state machines.
//!
//! One generic per-key state machine ([`CircuitRegistry`]) with two
//! façades: [`PipelineBreaker`] guards warehouse reads and can auto-reset
//! when an upstream-availability probe reports data present;
//! [`ServiceBreaker`] guards external-service calls with a `call` wrapper
//! and a scoped guard form.
//!
//! The registry is an explicit owned object injected into callers, not
//! ambient shared state; per-key counters are isolated and every
//! read-modify-write happens under one mutex.

mod pipeline;
mod registry;
mod service;

pub use pipeline::PipelineBreaker;
pub use registry::{CircuitRegistry, Gate, Transition};
pub use service::{CircuitGuard, ServiceBreaker};

use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::port::notifier::{Event, NotifierRegistry};
use crate::port::store::CircuitStateStore;

/// Tuning for one breaker instance.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub threshold: u32,
    /// Cooldown before an open circuit probes half-open.
    pub cooldown: Duration,
    /// Successful half-open trials required to close.
    pub half_open_max_calls: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            cooldown: Duration::from_secs(30 * 60),
            half_open_max_calls: 1,
        }
    }
}

/// Side-effect handler shared by both breaker variants.
///
/// Alerts once per transition (open-episode dedup is the registry's job)
/// and mirrors state to durable storage. Neither side effect may ever
/// propagate a failure to the protected caller.
pub(crate) struct Monitor {
    notifiers: Arc<NotifierRegistry>,
    store: Option<Arc<dyn CircuitStateStore>>,
}

impl Monitor {
    pub(crate) fn new(
        notifiers: Arc<NotifierRegistry>,
        store: Option<Arc<dyn CircuitStateStore>>,
    ) -> Self {
        Self { notifiers, store }
    }

    pub(crate) fn disabled() -> Self {
        Self {
            notifiers: Arc::new(NotifierRegistry::new()),
            store: None,
        }
    }

    pub(crate) fn apply(
        &self,
        registry: &CircuitRegistry,
        key: &str,
        transition: Option<Transition>,
    ) {
        let Some(transition) = transition else {
            return;
        };

        match transition {
            Transition::Opened {
                failures,
                alert: true,
            } => {
                self.notifiers.notify_all(Event::CircuitOpened {
                    key: key.to_string(),
                    failures,
                    cooldown: registry.config().cooldown,
                });
            }
            Transition::Closed => {
                self.notifiers.notify_all(Event::CircuitClosed {
                    key: key.to_string(),
                });
            }
            // Half-open probes and deduplicated reopens are persisted below
            // but not alerted.
            Transition::Opened { alert: false, .. } | Transition::HalfOpened => {}
        }

        if let Some(store) = &self.store {
            let status = registry.status(key);
            if let Err(e) = store.upsert(&status) {
                error!(key = %key, error = %e, "Failed to persist circuit state");
            }
        }
    }
}
