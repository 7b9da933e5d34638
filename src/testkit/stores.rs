//! In-memory store implementations for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::domain::{CircuitStatus, ExportAuditRecord, PickSource, PublishedPick};
use crate::error::{Error, Result};
use crate::port::artifact::ArtifactStore;
use crate::port::store::{AuditStore, CircuitStateStore, SnapshotStore};

/// In-memory [`SnapshotStore`] with a switchable write-failure mode.
#[derive(Default)]
pub struct MemorySnapshotStore {
    days: Mutex<HashMap<NaiveDate, Vec<PublishedPick>>>,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a day's partition directly.
    pub fn seed_day(&self, date: NaiveDate, rows: Vec<PublishedPick>) {
        self.days.lock().insert(date, rows);
    }

    /// Synchronous accessor for assertions.
    #[must_use]
    pub fn day_rows(&self, date: NaiveDate) -> Vec<PublishedPick> {
        self.days.lock().get(&date).cloned().unwrap_or_default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn replace_day(&self, date: NaiveDate, rows: &[PublishedPick]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("scripted snapshot write failure".to_string()));
        }
        self.days.lock().insert(date, rows.to_vec());
        Ok(())
    }

    async fn day(&self, date: NaiveDate) -> Result<Vec<PublishedPick>> {
        Ok(self.day_rows(date))
    }

    async fn graded_history(&self) -> Result<Vec<PublishedPick>> {
        let days = self.days.lock();
        Ok(days
            .values()
            .flatten()
            .filter(|p| p.pick.grading.result().is_some())
            .cloned()
            .collect())
    }

    async fn delete_manual(&self, date: NaiveDate, player_lookup: &str) -> Result<bool> {
        let mut days = self.days.lock();
        let Some(rows) = days.get_mut(&date) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|p| {
            !(p.source == PickSource::Manual && p.pick.player_lookup == player_lookup)
        });
        Ok(rows.len() < before)
    }
}

/// In-memory append-only [`AuditStore`].
#[derive(Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<ExportAuditRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryAuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn records(&self) -> Vec<ExportAuditRecord> {
        self.records.lock().clone()
    }
}

impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: &ExportAuditRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database("scripted audit write failure".to_string()));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// In-memory [`ArtifactStore`].
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<Vec<(String, serde_json::Value)>>,
    fail_writes: AtomicBool,
}

impl MemoryArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.artifacts.lock().clone()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn publish_json(&self, name: &str, body: &serde_json::Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Connection("scripted artifact write failure".to_string()));
        }
        self.artifacts.lock().push((name.to_string(), body.clone()));
        Ok(())
    }
}

/// Records every upserted [`CircuitStatus`].
#[derive(Default)]
pub struct RecordingCircuitStore {
    upserts: Mutex<Vec<CircuitStatus>>,
}

impl RecordingCircuitStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn upserts(&self) -> Vec<CircuitStatus> {
        self.upserts.lock().clone()
    }
}

impl CircuitStateStore for RecordingCircuitStore {
    fn upsert(&self, status: &CircuitStatus) -> Result<()> {
        self.upserts.lock().push(status.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<CircuitStatus>> {
        let mut latest: HashMap<String, CircuitStatus> = HashMap::new();
        for status in self.upserts.lock().iter() {
            latest.insert(status.key.clone(), status.clone());
        }
        let mut all: Vec<CircuitStatus> = latest.into_values().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(all)
    }
}
