//! Per-key circuit state machine.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::BreakerConfig;
use crate::domain::{CircuitState, CircuitStatus};

/// Persisted error text is bounded so one giant upstream message cannot
/// bloat the monitoring table.
const MAX_ERROR_LEN: usize = 500;

/// Mutable per-key record. `successes` is only meaningful in half-open;
/// `alert_sent` marks the current open episode as alerted and clears on
/// close.
#[derive(Debug, Clone)]
struct CircuitRecord {
    state: CircuitState,
    failures: u32,
    successes: u32,
    opened_at: Option<DateTime<Utc>>,
    last_success: Option<DateTime<Utc>>,
    last_failure: Option<DateTime<Utc>>,
    last_error: Option<String>,
    alert_sent: bool,
}

impl Default for CircuitRecord {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            failures: 0,
            successes: 0,
            opened_at: None,
            last_success: None,
            last_failure: None,
            last_error: None,
            alert_sent: false,
        }
    }
}

/// Whether a gated operation may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    Blocked {
        opened_at: DateTime<Utc>,
        retry_in: Duration,
    },
}

/// State transition produced by a record call, for alerting/persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The circuit opened (or reopened from half-open). `alert` is false
    /// when this open episode was already alerted.
    Opened { failures: u32, alert: bool },
    /// Cooldown elapsed; the circuit now admits trial calls.
    HalfOpened,
    /// The circuit closed and all counters were cleared.
    Closed,
}

/// Registry of circuits keyed by resource name.
///
/// All counters, timestamps and alert-dedup flags are tracked per key;
/// operations on one key never affect another. Every read-modify-write
/// runs under the registry mutex.
pub struct CircuitRegistry {
    config: BreakerConfig,
    circuits: Mutex<HashMap<String, CircuitRecord>>,
}

impl CircuitRegistry {
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            circuits: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Check whether `key` may proceed, transitioning open circuits to
    /// half-open once the cooldown has elapsed.
    pub fn gate(&self, key: &str) -> (Gate, Option<Transition>) {
        let mut circuits = self.circuits.lock();
        let record = circuits.entry(key.to_string()).or_default();

        match record.state {
            CircuitState::Closed | CircuitState::HalfOpen => (Gate::Allowed, None),
            CircuitState::Open => {
                let now = Utc::now();
                let opened_at = record.opened_at.unwrap_or(now);
                let cooldown = chrono::Duration::from_std(self.config.cooldown)
                    .unwrap_or(chrono::Duration::MAX);
                let elapsed = now.signed_duration_since(opened_at);

                if elapsed >= cooldown {
                    record.state = CircuitState::HalfOpen;
                    record.opened_at = None;
                    record.successes = 0;
                    (Gate::Allowed, Some(Transition::HalfOpened))
                } else {
                    let retry_in = (cooldown - elapsed).to_std().unwrap_or_default();
                    (
                        Gate::Blocked {
                            opened_at,
                            retry_in,
                        },
                        None,
                    )
                }
            }
        }
    }

    /// Convenience wrapper over [`gate`](Self::gate) that drops the
    /// transition. Callers that persist transitions should use `gate`.
    #[must_use]
    pub fn is_available(&self, key: &str) -> bool {
        matches!(self.gate(key).0, Gate::Allowed)
    }

    /// Record a successful operation against `key`.
    pub fn record_success(&self, key: &str) -> Option<Transition> {
        let mut circuits = self.circuits.lock();
        let record = circuits.entry(key.to_string()).or_default();
        let now = Utc::now();

        match record.state {
            CircuitState::Closed => {
                record.failures = 0;
                record.last_success = Some(now);
                None
            }
            CircuitState::HalfOpen => {
                record.successes += 1;
                record.last_success = Some(now);
                if record.successes >= self.config.half_open_max_calls {
                    *record = CircuitRecord {
                        last_success: Some(now),
                        last_failure: record.last_failure,
                        ..Default::default()
                    };
                    Some(Transition::Closed)
                } else {
                    None
                }
            }
            // A call admitted before the circuit opened finished late.
            CircuitState::Open => {
                record.last_success = Some(now);
                None
            }
        }
    }

    /// Record a failed operation against `key`.
    pub fn record_failure(&self, key: &str, error: &str) -> Option<Transition> {
        let mut circuits = self.circuits.lock();
        let record = circuits.entry(key.to_string()).or_default();
        let now = Utc::now();
        record.last_failure = Some(now);
        record.last_error = Some(truncate_error(error));

        match record.state {
            CircuitState::Closed => {
                record.failures += 1;
                if record.failures >= self.config.threshold {
                    record.state = CircuitState::Open;
                    record.opened_at = Some(now);
                    let alert = !record.alert_sent;
                    record.alert_sent = true;
                    Some(Transition::Opened {
                        failures: record.failures,
                        alert,
                    })
                } else {
                    None
                }
            }
            // Any single half-open failure reopens with a fresh cooldown,
            // discarding partial success credit.
            CircuitState::HalfOpen => {
                record.failures += 1;
                record.successes = 0;
                record.state = CircuitState::Open;
                record.opened_at = Some(now);
                let alert = !record.alert_sent;
                record.alert_sent = true;
                Some(Transition::Opened {
                    failures: record.failures,
                    alert,
                })
            }
            CircuitState::Open => None,
        }
    }

    /// Force an open circuit closed (upstream recovered), bypassing
    /// half-open. No-op unless the circuit is open.
    pub fn force_close(&self, key: &str) -> Option<Transition> {
        let mut circuits = self.circuits.lock();
        let record = circuits.entry(key.to_string()).or_default();
        if record.state != CircuitState::Open {
            return None;
        }
        *record = CircuitRecord {
            last_success: record.last_success,
            last_failure: record.last_failure,
            ..Default::default()
        };
        Some(Transition::Closed)
    }

    /// Snapshot one circuit for persistence or display.
    #[must_use]
    pub fn status(&self, key: &str) -> CircuitStatus {
        let circuits = self.circuits.lock();
        let record = circuits.get(key).cloned().unwrap_or_default();
        self.status_of(key, &record)
    }

    /// Snapshot every tracked circuit, sorted by key.
    #[must_use]
    pub fn statuses(&self) -> Vec<CircuitStatus> {
        let circuits = self.circuits.lock();
        let mut all: Vec<CircuitStatus> = circuits
            .iter()
            .map(|(key, record)| self.status_of(key, record))
            .collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all
    }

    fn status_of(&self, key: &str, record: &CircuitRecord) -> CircuitStatus {
        CircuitStatus {
            key: key.to_string(),
            state: record.state,
            failure_count: record.failures,
            threshold: self.config.threshold,
            timeout_seconds: self.config.cooldown.as_secs(),
            opened_at: record.opened_at,
            last_success: record.last_success,
            last_failure: record.last_failure,
            last_error: record.last_error.clone(),
            updated_at: Utc::now(),
        }
    }
}

fn truncate_error(message: &str) -> String {
    if message.len() <= MAX_ERROR_LEN {
        return message.to_string();
    }
    let mut end = MAX_ERROR_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BreakerConfig {
        BreakerConfig {
            threshold: 3,
            cooldown: Duration::from_millis(40),
            half_open_max_calls: 2,
        }
    }

    #[test]
    fn stays_closed_below_threshold() {
        let registry = CircuitRegistry::new(test_config());
        assert!(registry.record_failure("db", "boom").is_none());
        assert!(registry.record_failure("db", "boom").is_none());
        assert!(registry.is_available("db"));
        assert_eq!(registry.status("db").state, CircuitState::Closed);
    }

    #[test]
    fn opens_exactly_at_threshold() {
        let registry = CircuitRegistry::new(test_config());
        registry.record_failure("db", "boom");
        registry.record_failure("db", "boom");
        let transition = registry.record_failure("db", "boom");
        assert_eq!(
            transition,
            Some(Transition::Opened {
                failures: 3,
                alert: true
            })
        );
        assert!(!registry.is_available("db"));
    }

    #[test]
    fn success_resets_failure_streak() {
        let registry = CircuitRegistry::new(test_config());
        registry.record_failure("db", "boom");
        registry.record_failure("db", "boom");
        registry.record_success("db");
        registry.record_failure("db", "boom");
        registry.record_failure("db", "boom");
        // Streak broke, so still closed after four total failures.
        assert!(registry.is_available("db"));
    }

    #[test]
    fn cooldown_elapse_half_opens() {
        let registry = CircuitRegistry::new(test_config());
        for _ in 0..3 {
            registry.record_failure("db", "boom");
        }
        let (gate, _) = registry.gate("db");
        assert!(matches!(gate, Gate::Blocked { .. }));

        std::thread::sleep(Duration::from_millis(50));
        let (gate, transition) = registry.gate("db");
        assert_eq!(gate, Gate::Allowed);
        assert_eq!(transition, Some(Transition::HalfOpened));
        assert_eq!(registry.status("db").state, CircuitState::HalfOpen);
    }

    #[test]
    fn half_open_needs_all_successes_to_close() {
        let registry = CircuitRegistry::new(test_config());
        for _ in 0..3 {
            registry.record_failure("db", "boom");
        }
        std::thread::sleep(Duration::from_millis(50));
        registry.gate("db");

        assert!(registry.record_success("db").is_none());
        assert_eq!(registry.record_success("db"), Some(Transition::Closed));
        assert_eq!(registry.status("db").state, CircuitState::Closed);
        assert_eq!(registry.status("db").failure_count, 0);
    }

    #[test]
    fn half_open_failure_reopens_without_partial_credit() {
        let registry = CircuitRegistry::new(test_config());
        for _ in 0..3 {
            registry.record_failure("db", "boom");
        }
        std::thread::sleep(Duration::from_millis(50));
        registry.gate("db");
        registry.record_success("db"); // one of two needed

        let transition = registry.record_failure("db", "still broken");
        assert!(matches!(transition, Some(Transition::Opened { alert: false, .. })));
        assert!(!registry.is_available("db"));
        assert!(registry.status("db").opened_at.is_some());
    }

    #[test]
    fn keys_are_isolated() {
        let registry = CircuitRegistry::new(test_config());
        for _ in 0..3 {
            registry.record_failure("a", "boom");
        }
        assert!(!registry.is_available("a"));
        assert!(registry.is_available("b"));
        assert_eq!(registry.status("b").failure_count, 0);
    }

    #[test]
    fn alert_flag_set_once_per_open_episode() {
        let registry = CircuitRegistry::new(test_config());
        for _ in 0..2 {
            registry.record_failure("db", "boom");
        }
        let first = registry.record_failure("db", "boom");
        assert!(matches!(first, Some(Transition::Opened { alert: true, .. })));

        // Reopen after a failed half-open probe: same episode, no new alert.
        std::thread::sleep(Duration::from_millis(50));
        registry.gate("db");
        let reopened = registry.record_failure("db", "boom");
        assert!(matches!(
            reopened,
            Some(Transition::Opened { alert: false, .. })
        ));

        // Closing clears the flag; a later episode alerts again.
        std::thread::sleep(Duration::from_millis(50));
        registry.gate("db");
        registry.record_success("db");
        registry.record_success("db");
        for _ in 0..2 {
            registry.record_failure("db", "boom");
        }
        let again = registry.record_failure("db", "boom");
        assert!(matches!(again, Some(Transition::Opened { alert: true, .. })));
    }

    #[test]
    fn force_close_only_from_open() {
        let registry = CircuitRegistry::new(test_config());
        assert!(registry.force_close("db").is_none());

        for _ in 0..3 {
            registry.record_failure("db", "boom");
        }
        assert_eq!(registry.force_close("db"), Some(Transition::Closed));
        assert!(registry.is_available("db"));
        assert_eq!(registry.status("db").failure_count, 0);
    }

    #[test]
    fn error_text_is_truncated() {
        let registry = CircuitRegistry::new(test_config());
        let long = "x".repeat(2000);
        registry.record_failure("db", &long);
        let status = registry.status("db");
        assert_eq!(status.last_error.unwrap().len(), MAX_ERROR_LEN);
    }
}
