//! Persistence ports for snapshots, audit records and circuit state.

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{CircuitStatus, ExportAuditRecord, PublishedPick};
use crate::error::Result;

/// Storage operations for the locked snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Atomically replace the date's whole partition with `rows`.
    ///
    /// All-or-nothing: a half-written day must never become visible.
    fn replace_day(
        &self,
        date: NaiveDate,
        rows: &[PublishedPick],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Load the locked rows for a date.
    fn day(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<PublishedPick>>> + Send;

    /// Load every graded (or voided) pick across all dates, for the
    /// win/loss aggregation layer.
    fn graded_history(&self) -> impl Future<Output = Result<Vec<PublishedPick>>> + Send;

    /// Delete a manual-sourced locked row so the locking mechanism cannot
    /// resurrect a removed manual pick. Returns whether a row was deleted.
    fn delete_manual(
        &self,
        date: NaiveDate,
        player_lookup: &str,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Append-only audit trail of publish invocations.
pub trait AuditStore: Send + Sync {
    fn append(&self, record: &ExportAuditRecord) -> impl Future<Output = Result<()>> + Send;
}

impl<T: SnapshotStore> SnapshotStore for std::sync::Arc<T> {
    fn replace_day(
        &self,
        date: NaiveDate,
        rows: &[PublishedPick],
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).replace_day(date, rows)
    }

    fn day(&self, date: NaiveDate) -> impl Future<Output = Result<Vec<PublishedPick>>> + Send {
        (**self).day(date)
    }

    fn graded_history(&self) -> impl Future<Output = Result<Vec<PublishedPick>>> + Send {
        (**self).graded_history()
    }

    fn delete_manual(
        &self,
        date: NaiveDate,
        player_lookup: &str,
    ) -> impl Future<Output = Result<bool>> + Send {
        (**self).delete_manual(date, player_lookup)
    }
}

impl<T: AuditStore> AuditStore for std::sync::Arc<T> {
    fn append(&self, record: &ExportAuditRecord) -> impl Future<Output = Result<()>> + Send {
        (**self).append(record)
    }
}

/// Durable mirror of circuit state for external monitoring.
///
/// Synchronous on purpose: it is called from inside the breaker's state
/// transitions, and the backing store is an embedded database.
pub trait CircuitStateStore: Send + Sync {
    /// Insert or update the row for `status.key`.
    fn upsert(&self, status: &CircuitStatus) -> Result<()>;

    /// All mirrored circuits, for operator tooling.
    fn load_all(&self) -> Result<Vec<CircuitStatus>>;
}
