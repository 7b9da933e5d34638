//! Publish pipeline behavior, from sources through to the artifact.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use picklock::adapter::{SqliteAuditStore, SqliteSnapshotStore, SqliteSources};
use picklock::breaker::{BreakerConfig, PipelineBreaker, ServiceBreaker};
use picklock::db::{create_pool, run_migrations};
use picklock::domain::{PickSource, TriggerSource};
use picklock::engine::Publisher;
use picklock::port::notifier::{Event, NotifierRegistry};
use picklock::port::source::PickSources;
use picklock::port::store::SnapshotStore;
use picklock::testkit::notify::RecordingNotifier;
use picklock::testkit::picks::{manual_pick, published_pick, signal_pick};
use picklock::testkit::sources::ScriptedSources;
use picklock::testkit::stores::{MemoryArtifactStore, MemoryAuditStore, MemorySnapshotStore};
use rust_decimal_macros::dec;

fn date() -> NaiveDate {
    "2026-08-05".parse().unwrap()
}

fn breakers() -> (PipelineBreaker, ServiceBreaker) {
    let config = BreakerConfig {
        threshold: 3,
        cooldown: Duration::from_secs(600),
        half_open_max_calls: 1,
    };
    (
        PipelineBreaker::new(config.clone()),
        ServiceBreaker::new(config),
    )
}

fn publisher(
    sources: ScriptedSources,
    snapshots: Arc<MemorySnapshotStore>,
    audits: Arc<MemoryAuditStore>,
    artifacts: Arc<MemoryArtifactStore>,
    notifiers: Arc<NotifierRegistry>,
) -> Publisher<Arc<MemorySnapshotStore>, Arc<MemoryAuditStore>> {
    let (reads, writes) = breakers();
    Publisher::new(
        Arc::new(sources),
        snapshots,
        audits,
        artifacts,
        notifiers,
        reads,
        writes,
        Duration::from_millis(200),
    )
}

#[tokio::test]
async fn happy_path_persists_audits_and_renders() {
    let sources = ScriptedSources::new()
        .with_signal(vec![
            signal_pick("alpha", "20260805_BOS_LAL").rank(1).edge(dec!(4)).build(),
            signal_pick("bravo", "20260805_BOS_LAL").rank(2).edge(dec!(2)).build(),
        ])
        .with_published(vec![published_pick("alpha", "20260805_BOS_LAL").rank(1).build()])
        .with_manual(vec![manual_pick("manual-m", "20260805_NYK_MIA").build()]);

    let snapshots = Arc::new(MemorySnapshotStore::new());
    let audits = Arc::new(MemoryAuditStore::new());
    let artifacts = Arc::new(MemoryArtifactStore::new());
    let publisher = publisher(
        sources,
        snapshots.clone(),
        audits.clone(),
        artifacts.clone(),
        Arc::new(NotifierRegistry::new()),
    );

    let report = publisher
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();

    assert!(report.snapshot_written);
    assert!(report.audit_written);
    assert!(report.artifact_written);
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.new, 2);

    // Snapshot holds the full merged partition with contiguous ranks.
    let rows = snapshots.day_rows(date());
    assert_eq!(rows.len(), 3);
    let ranks: Vec<u32> = rows.iter().map(|r| r.pick.rank.unwrap()).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    // One audit row with matching counts and trigger.
    let audit = audits.records();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].summary.total, 3);
    assert_eq!(audit[0].trigger_source, TriggerSource::Scheduled);
    assert!(audit[0].picks_snapshot.contains("alpha"));

    // Artifact rendered under the date's name.
    let published = artifacts.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "best_picks_2026-08-05.json");
    assert_eq!(published[0].1["picks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn failed_signal_source_degrades_and_keeps_published() {
    let sources = ScriptedSources::new()
        .failing_signal("warehouse exploded")
        .with_published(vec![
            published_pick("alpha", "20260805_BOS_LAL").rank(1).build(),
            published_pick("bravo", "20260805_BOS_LAL").rank(2).build(),
        ]);

    let snapshots = Arc::new(MemorySnapshotStore::new());
    let artifacts = Arc::new(MemoryArtifactStore::new());
    let publisher = publisher(
        sources,
        snapshots.clone(),
        Arc::new(MemoryAuditStore::new()),
        artifacts.clone(),
        Arc::new(NotifierRegistry::new()),
    );

    let report = publisher
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();

    // Every published pick survives, marked dropped-from-signal.
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.dropped, 2);
    assert!(report.artifact_written);
    assert_eq!(snapshots.day_rows(date()).len(), 2);
}

#[tokio::test]
async fn slow_sources_time_out_to_empty() {
    let sources = ScriptedSources::new()
        .with_signal(vec![signal_pick("alpha", "20260805_BOS_LAL").build()])
        .with_delay(Duration::from_secs(5));

    let artifacts = Arc::new(MemoryArtifactStore::new());
    let publisher = publisher(
        sources,
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(MemoryAuditStore::new()),
        artifacts.clone(),
        Arc::new(NotifierRegistry::new()),
    );

    let report = publisher
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();

    // All four reads timed out; the run still completes with an artifact.
    assert_eq!(report.summary.total, 0);
    assert!(report.artifact_written);
    assert_eq!(artifacts.published().len(), 1);
}

#[tokio::test]
async fn artifact_still_published_when_every_persistence_write_fails() {
    let sources = ScriptedSources::new()
        .with_signal(vec![signal_pick("alpha", "20260805_BOS_LAL").build()]);

    let snapshots = Arc::new(MemorySnapshotStore::new());
    snapshots.fail_writes(true);
    let audits = Arc::new(MemoryAuditStore::new());
    audits.fail_writes(true);
    let artifacts = Arc::new(MemoryArtifactStore::new());

    let publisher = publisher(
        sources,
        snapshots,
        audits,
        artifacts.clone(),
        Arc::new(NotifierRegistry::new()),
    );

    let report = publisher
        .publish_day(date(), TriggerSource::PostGrading)
        .await
        .unwrap();

    assert!(!report.snapshot_written);
    assert!(!report.audit_written);
    // Staleness is preferable to an outage: the artifact went out anyway.
    assert!(report.artifact_written);
    assert_eq!(artifacts.published().len(), 1);
}

#[tokio::test]
async fn artifact_failure_is_reported_not_raised() {
    let sources =
        ScriptedSources::new().with_signal(vec![signal_pick("alpha", "20260805_BOS_LAL").build()]);
    let artifacts = Arc::new(MemoryArtifactStore::new());
    artifacts.fail_writes(true);

    let publisher = publisher(
        sources,
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(MemoryAuditStore::new()),
        artifacts,
        Arc::new(NotifierRegistry::new()),
    );

    let report = publisher
        .publish_day(date(), TriggerSource::Manual)
        .await
        .unwrap();

    assert!(report.snapshot_written);
    assert!(!report.artifact_written);
}

#[tokio::test]
async fn publish_emits_summary_event() {
    let recorder = RecordingNotifier::new();
    let events = recorder.events_handle();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder));

    let sources =
        ScriptedSources::new().with_signal(vec![signal_pick("alpha", "20260805_BOS_LAL").build()]);
    let publisher = publisher(
        sources,
        Arc::new(MemorySnapshotStore::new()),
        Arc::new(MemoryAuditStore::new()),
        Arc::new(MemoryArtifactStore::new()),
        Arc::new(registry),
    );

    publisher
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();

    let events = events.lock().clone();
    assert!(events.iter().any(
        |e| matches!(e, Event::PicksPublished { date: d, summary } if *d == date() && summary.total == 1)
    ));
}

/// End-to-end over SQLite: seed warehouse tables, publish twice, verify the
/// partition overwrite and the lock guarantee.
#[tokio::test]
async fn sqlite_end_to_end_locking_across_runs() {
    let env = support::test_env();
    let pool = create_pool(env.db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();

    // Seed one signal pick and one scheduled game via the admin path.
    {
        use diesel::prelude::*;
        use picklock::db::model::NewSignalPickRow;
        use picklock::db::schema::signal_picks;

        let row = NewSignalPickRow {
            player_lookup: "alpha".to_string(),
            game_id: "20260805_BOS_LAL".to_string(),
            game_date: "2026-08-05".to_string(),
            player_name: "Alpha".to_string(),
            team_abbr: "BOS".to_string(),
            opponent_abbr: "LAL".to_string(),
            recommendation: "OVER".to_string(),
            line_value: "25.5".to_string(),
            edge: "3.0".to_string(),
            rank: Some(1),
            pick_angles: "[]".to_string(),
            predicted_points: None,
            ultra_tier: "true".to_string(),
            source: "algorithm".to_string(),
            prediction_correct: None,
            actual_points: None,
            is_voided: 0,
            void_reason: None,
            created_at: "2026-08-05T08:00:00Z".to_string(),
        };
        let mut conn = pool.get().unwrap();
        diesel::insert_into(signal_picks::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();
    }

    let make_publisher = || {
        let (reads, writes) = breakers();
        Publisher::new(
            Arc::new(SqliteSources::new(pool.clone())),
            SqliteSnapshotStore::new(pool.clone()),
            SqliteAuditStore::new(pool.clone()),
            Arc::new(picklock::adapter::FsArtifactStore::new(
                env.export_dir.clone(),
            )),
            Arc::new(NotifierRegistry::new()),
            reads,
            writes,
            Duration::from_secs(5),
        )
    };

    // First run locks the signal pick.
    let report = make_publisher()
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.new, 1);
    assert!(env.export_dir.join("best_picks_2026-08-05.json").exists());

    // Wipe the signal table: the feed dropped the pick.
    {
        use diesel::prelude::*;
        use picklock::db::schema::signal_picks;
        let mut conn = pool.get().unwrap();
        diesel::delete(signal_picks::table).execute(&mut conn).unwrap();
    }

    // Second run: the lock keeps the pick alive, premium intact.
    let report = make_publisher()
        .publish_day(date(), TriggerSource::Scheduled)
        .await
        .unwrap();
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.dropped, 1);

    let snapshot = SqliteSnapshotStore::new(pool.clone());
    let rows = snapshot.day(date()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].pick.player_lookup, "alpha");
    assert!(rows[0].pick.ultra_tier);
    assert_eq!(rows[0].source, PickSource::Algorithm);

    // The sources read the locked rows back for the next merge.
    let sources = SqliteSources::new(pool);
    let published = sources.published_picks(date()).await.unwrap();
    assert_eq!(published.len(), 1);
    assert!(!published[0]
        .pick
        .game_id
        .is_home(&published[0].pick.team_abbr));
}
