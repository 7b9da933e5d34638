//! Application wiring.
//!
//! Builds the pool, stores, breakers and publisher from configuration.
//! Each CLI invocation constructs one [`App`] and runs one operation.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::adapter::{
    FsArtifactStore, SqliteAuditStore, SqliteAvailabilityProbe, SqliteCircuitStore,
    SqliteManualPicks, SqliteSnapshotStore, SqliteSources,
};
use crate::breaker::{PipelineBreaker, ServiceBreaker};
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::domain::TriggerSource;
use crate::engine::{PublishReport, Publisher};
use crate::error::Result;
use crate::port::notifier::{LogNotifier, NotifierRegistry};
use crate::port::store::CircuitStateStore;

/// Long-lived application context.
pub struct App {
    config: Config,
    pool: DbPool,
    notifiers: Arc<NotifierRegistry>,
}

impl App {
    /// Open the database, apply migrations and assemble shared services.
    pub fn new(config: Config) -> Result<Self> {
        let pool = db::create_pool(&config.database.path)?;
        db::run_migrations(&pool)?;

        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(LogNotifier));
        info!(database = %config.database.path, "picklock initialized");

        Ok(Self {
            config,
            pool,
            notifiers: Arc::new(notifiers),
        })
    }

    /// Run one publish pass for a date.
    pub async fn publish(&self, date: NaiveDate, trigger: TriggerSource) -> Result<PublishReport> {
        let circuit_store: Arc<dyn CircuitStateStore> =
            Arc::new(SqliteCircuitStore::new(self.pool.clone()));

        let reads = PipelineBreaker::new(self.config.pipeline_breaker())
            .with_probe(Arc::new(SqliteAvailabilityProbe::new(self.pool.clone())))
            .with_monitoring(self.notifiers.clone(), Some(circuit_store.clone()));
        let writes = ServiceBreaker::new(self.config.service_breaker())
            .with_monitoring(self.notifiers.clone(), Some(circuit_store));

        let publisher = Publisher::new(
            Arc::new(SqliteSources::new(self.pool.clone())),
            SqliteSnapshotStore::new(self.pool.clone()),
            SqliteAuditStore::new(self.pool.clone()),
            Arc::new(FsArtifactStore::new(self.config.export.dir.clone())),
            self.notifiers.clone(),
            reads,
            writes,
            self.config.query_timeout(),
        );

        publisher.publish_day(date, trigger).await
    }

    /// Operator access to manual pick administration.
    #[must_use]
    pub fn manual_picks(&self) -> SqliteManualPicks {
        SqliteManualPicks::new(self.pool.clone())
    }

    /// Operator access to the locked snapshot.
    #[must_use]
    pub fn snapshots(&self) -> SqliteSnapshotStore {
        SqliteSnapshotStore::new(self.pool.clone())
    }

    /// Operator access to mirrored circuit state.
    #[must_use]
    pub fn circuits(&self) -> SqliteCircuitStore {
        SqliteCircuitStore::new(self.pool.clone())
    }
}
