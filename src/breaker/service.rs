//! Service breaker: wraps calls to external dependencies.

use std::future::Future;
use std::sync::Arc;

use super::{BreakerConfig, CircuitRegistry, Gate, Monitor};
use crate::domain::CircuitStatus;
use crate::error::{CircuitError, Error, Result};
use crate::port::notifier::NotifierRegistry;
use crate::port::store::CircuitStateStore;

/// Circuit breaker for external-service calls.
///
/// `call` executes an operation only when the circuit admits it, records
/// the outcome, and re-raises the operation's own error unchanged. The
/// scoped [`guard`](Self::guard) form covers call sites that cannot be
/// expressed as a single closure.
pub struct ServiceBreaker {
    registry: CircuitRegistry,
    monitor: Monitor,
}

impl ServiceBreaker {
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            registry: CircuitRegistry::new(config),
            monitor: Monitor::disabled(),
        }
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

    /// Whether a call on `key` would currently be admitted.
    #[must_use]
    pub fn is_available(&self, key: &str) -> bool {
        let (gate, transition) = self.registry.gate(key);
        self.monitor.apply(&self.registry, key, transition);
        matches!(gate, Gate::Allowed)
    }

    /// Run `op` through the circuit, counting every error as a failure.
    pub async fn call<T, F, Fut>(&self, key: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.call_filtered(key, |_| true, op).await
    }

    /// Run `op` through the circuit; only errors accepted by
    /// `counts_as_failure` are recorded against it. The operation's error
    /// is returned unchanged either way.
    pub async fn call_filtered<T, F, Fut, C>(
        &self,
        key: &str,
        counts_as_failure: C,
        op: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        C: Fn(&Error) -> bool,
    {
        self.check_gate(key)?;

        match op().await {
            Ok(value) => {
                let transition = self.registry.record_success(key);
                self.monitor.apply(&self.registry, key, transition);
                Ok(value)
            }
            Err(error) => {
                if counts_as_failure(&error) {
                    let transition = self.registry.record_failure(key, &error.to_string());
                    self.monitor.apply(&self.registry, key, transition);
                }
                Err(error)
            }
        }
    }

    /// Scoped execution form: returns a guard once the circuit admits the
    /// block. Call [`CircuitGuard::complete`] on clean exit; dropping the
    /// guard without completing records a failure.
    pub fn guard(&self, key: &str) -> Result<CircuitGuard<'_>> {
        self.check_gate(key)?;
        Ok(CircuitGuard {
            breaker: self,
            key: key.to_string(),
            settled: false,
        })
    }

    #[must_use]
    pub fn status(&self, key: &str) -> CircuitStatus {
        self.registry.status(key)
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<CircuitStatus> {
        self.registry.statuses()
    }

    fn check_gate(&self, key: &str) -> Result<()> {
        let (gate, transition) = self.registry.gate(key);
        self.monitor.apply(&self.registry, key, transition);
        match gate {
            Gate::Allowed => Ok(()),
            Gate::Blocked {
                opened_at,
                retry_in,
            } => Err(CircuitError::Open {
                key: key.to_string(),
                opened_at,
                retry_in,
            }
            .into()),
        }
    }

    fn record_success(&self, key: &str) {
        let transition = self.registry.record_success(key);
        self.monitor.apply(&self.registry, key, transition);
    }

    fn record_failure(&self, key: &str, error: &str) {
        let transition = self.registry.record_failure(key, error);
        self.monitor.apply(&self.registry, key, transition);
    }
}

/// Scoped-execution handle from [`ServiceBreaker::guard`].
pub struct CircuitGuard<'a> {
    breaker: &'a ServiceBreaker,
    key: String,
    settled: bool,
}

impl CircuitGuard<'_> {
    /// Record success for the guarded block.
    pub fn complete(mut self) {
        self.breaker.record_success(&self.key);
        self.settled = true;
    }

    /// Record an explicit failure for the guarded block.
    pub fn fail(mut self, error: &str) {
        self.breaker.record_failure(&self.key, error);
        self.settled = true;
    }
}

impl Drop for CircuitGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker
                .record_failure(&self.key, "guarded block exited without completing");
        }
    }
}
