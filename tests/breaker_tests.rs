//! Circuit breaker behavior across both variants.

use std::sync::Arc;
use std::time::Duration;

use picklock::breaker::{BreakerConfig, PipelineBreaker, ServiceBreaker};
use picklock::domain::CircuitState;
use picklock::error::Error;
use picklock::port::notifier::{Event, NotifierRegistry};
use picklock::port::source::ProbeOutcome;
use picklock::testkit::notify::RecordingNotifier;
use picklock::testkit::sources::FixedProbe;
use picklock::testkit::stores::RecordingCircuitStore;

fn config(threshold: u32, cooldown: Duration) -> BreakerConfig {
    BreakerConfig {
        threshold,
        cooldown,
        half_open_max_calls: 1,
    }
}

async fn fail_call(breaker: &ServiceBreaker, key: &str) -> Error {
    breaker
        .call(key, || async {
            Err::<(), _>(Error::Connection("refused".to_string()))
        })
        .await
        .unwrap_err()
}

#[tokio::test]
async fn threshold_is_exact() {
    let breaker = ServiceBreaker::new(config(4, Duration::from_secs(300)));

    for _ in 0..3 {
        let err = fail_call(&breaker, "svc").await;
        assert!(!err.is_circuit_open());
    }
    assert!(breaker.is_available("svc"));

    // The fourth failure trips it.
    fail_call(&breaker, "svc").await;
    assert!(!breaker.is_available("svc"));
    assert_eq!(breaker.status("svc").state, CircuitState::Open);
}

#[tokio::test]
async fn half_open_single_failure_reopens_with_fresh_cooldown() {
    let breaker = ServiceBreaker::new(config(1, Duration::from_millis(30)));
    fail_call(&breaker, "svc").await;
    assert!(!breaker.is_available("svc"));
    let first_opened = breaker.status("svc").opened_at.unwrap();

    tokio::time::sleep(Duration::from_millis(40)).await;
    // Cooldown elapsed: half-open admits one trial, which fails.
    assert!(breaker.is_available("svc"));
    fail_call(&breaker, "svc").await;

    let status = breaker.status("svc");
    assert_eq!(status.state, CircuitState::Open);
    assert!(status.opened_at.unwrap() > first_opened);
    assert!(!breaker.is_available("svc"));
}

#[tokio::test]
async fn half_open_success_closes_and_clears_counters() {
    let breaker = ServiceBreaker::new(config(1, Duration::from_millis(30)));
    fail_call(&breaker, "svc").await;

    tokio::time::sleep(Duration::from_millis(40)).await;
    breaker
        .call("svc", || async { Ok::<_, Error>(()) })
        .await
        .unwrap();

    let status = breaker.status("svc");
    assert_eq!(status.state, CircuitState::Closed);
    assert_eq!(status.failure_count, 0);
}

#[tokio::test]
async fn keys_are_fully_isolated() {
    let breaker = ServiceBreaker::new(config(1, Duration::from_secs(300)));
    fail_call(&breaker, "a").await;

    assert!(!breaker.is_available("a"));
    assert!(breaker.is_available("b"));
    assert_eq!(breaker.status("b").failure_count, 0);

    breaker
        .call("b", || async { Ok::<_, Error>(()) })
        .await
        .unwrap();
    assert_eq!(breaker.status("a").state, CircuitState::Open);
}

#[tokio::test]
async fn open_rejection_carries_key_and_cooldown() {
    let breaker = ServiceBreaker::new(config(1, Duration::from_secs(300)));
    fail_call(&breaker, "artifact_store").await;

    let err = breaker
        .call("artifact_store", || async { Ok::<_, Error>(()) })
        .await
        .unwrap_err();

    match err {
        Error::Circuit(picklock::error::CircuitError::Open { key, retry_in, .. }) => {
            assert_eq!(key, "artifact_store");
            assert!(retry_in <= Duration::from_secs(300));
            assert!(retry_in > Duration::from_secs(250));
        }
        other => panic!("expected circuit-open error, got {other}"),
    }
}

#[tokio::test]
async fn one_alert_per_open_episode_and_one_per_close() {
    let recorder = RecordingNotifier::new();
    let events = recorder.events_handle();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder));

    let store = Arc::new(RecordingCircuitStore::new());
    let breaker = ServiceBreaker::new(config(1, Duration::from_millis(30)))
        .with_monitoring(Arc::new(registry), Some(store.clone()));

    // Trip, then fail again while open via a half-open probe.
    fail_call(&breaker, "svc").await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(breaker.is_available("svc"));
    fail_call(&breaker, "svc").await;

    // Recover.
    tokio::time::sleep(Duration::from_millis(40)).await;
    breaker
        .call("svc", || async { Ok::<_, Error>(()) })
        .await
        .unwrap();

    let events = events.lock().clone();
    let opened = events
        .iter()
        .filter(|e| matches!(e, Event::CircuitOpened { .. }))
        .count();
    let closed = events
        .iter()
        .filter(|e| matches!(e, Event::CircuitClosed { .. }))
        .count();
    // Two opens (one episode; the reopen is deduplicated) and one close.
    assert_eq!(opened, 1);
    assert_eq!(closed, 1);

    // Every transition was mirrored to the store.
    let upserts = store.upserts();
    assert!(upserts.len() >= 3);
    assert_eq!(upserts.last().unwrap().state, CircuitState::Closed);
}

#[tokio::test]
async fn pipeline_auto_reset_closes_on_available_probe() {
    let breaker = PipelineBreaker::new(config(1, Duration::from_secs(600)))
        .with_probe(Arc::new(FixedProbe(ProbeOutcome::Available)));
    breaker.record_failure("warehouse:signal:2026-08-05", "partition missing");

    // Cooldown has not elapsed, but upstream data appeared.
    assert!(breaker.is_available("warehouse:signal:2026-08-05").await);
    assert_eq!(
        breaker.status("warehouse:signal:2026-08-05").state,
        CircuitState::Closed
    );
}

#[tokio::test]
async fn pipeline_auto_reset_emits_close_alert() {
    let recorder = RecordingNotifier::new();
    let events = recorder.events_handle();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder));

    let breaker = PipelineBreaker::new(config(1, Duration::from_secs(600)))
        .with_probe(Arc::new(FixedProbe(ProbeOutcome::Available)))
        .with_monitoring(Arc::new(registry), None);
    breaker.record_failure("warehouse:signal:2026-08-05", "partition missing");
    assert!(breaker.is_available("warehouse:signal:2026-08-05").await);

    let events = events.lock().clone();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::CircuitClosed { key } if key.contains("signal"))));
}

#[tokio::test]
async fn pipeline_unknown_probe_keeps_rejecting() {
    let breaker = PipelineBreaker::new(config(1, Duration::from_secs(600)))
        .with_probe(Arc::new(FixedProbe(ProbeOutcome::Unknown)));
    breaker.record_failure("warehouse:signal:2026-08-05", "partition missing");

    assert!(!breaker.is_available("warehouse:signal:2026-08-05").await);
    assert_eq!(
        breaker.status("warehouse:signal:2026-08-05").state,
        CircuitState::Open
    );
}
