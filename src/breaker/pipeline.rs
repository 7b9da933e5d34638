//! Pipeline breaker: guards warehouse reads with auto-reset.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{BreakerConfig, CircuitRegistry, Gate, Monitor};
use crate::domain::CircuitStatus;
use crate::port::notifier::NotifierRegistry;
use crate::port::source::{AvailabilityProbe, ProbeOutcome};
use crate::port::store::CircuitStateStore;

/// Circuit breaker for data-pipeline processors.
///
/// While a circuit is open, an optional upstream-availability probe runs
/// before rejecting: if upstream data has appeared, the circuit
/// force-closes immediately (a recovered dependency, not a retried call).
/// The probe failing can never damage the circuit further.
pub struct PipelineBreaker {
    registry: CircuitRegistry,
    probe: Option<Arc<dyn AvailabilityProbe>>,
    monitor: Monitor,
}

impl PipelineBreaker {
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            registry: CircuitRegistry::new(config),
            probe: None,
            monitor: Monitor::disabled(),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn AvailabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    #[must_use]
    pub fn with_monitoring(
        mut self,
        notifiers: Arc<NotifierRegistry>,
        store: Option<Arc<dyn CircuitStateStore>>,
    ) -> Self {
        self.monitor = Monitor::new(notifiers, store);
        self
    }

    /// Whether an operation on `key` may proceed.
    ///
    /// Runs the auto-reset probe when blocked; transitions (half-open,
    /// forced close) are alerted and persisted as they happen.
    pub async fn is_available(&self, key: &str) -> bool {
        let (gate, transition) = self.registry.gate(key);
        self.monitor.apply(&self.registry, key, transition);

        let Gate::Blocked { retry_in, .. } = gate else {
            return true;
        };

        if let Some(probe) = &self.probe {
            match probe.check(key).await {
                Ok(ProbeOutcome::Available) => {
                    info!(key = %key, "Upstream data available, auto-resetting circuit");
                    let transition = self.registry.force_close(key);
                    self.monitor.apply(&self.registry, key, transition);
                    return true;
                }
                Ok(outcome) => {
                    debug!(key = %key, ?outcome, "Availability probe did not confirm recovery");
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Availability probe failed, keeping circuit state");
                }
            }
        }

        debug!(
            key = %key,
            retry_in_secs = retry_in.as_secs(),
            "Circuit open, rejecting operation"
        );
        false
    }

    pub fn record_success(&self, key: &str) {
        let transition = self.registry.record_success(key);
        self.monitor.apply(&self.registry, key, transition);
    }

    pub fn record_failure(&self, key: &str, error: &str) {
        let transition = self.registry.record_failure(key, error);
        self.monitor.apply(&self.registry, key, transition);
    }

    #[must_use]
    pub fn status(&self, key: &str) -> CircuitStatus {
        self.registry.status(key)
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<CircuitStatus> {
        self.registry.statuses()
    }
}
