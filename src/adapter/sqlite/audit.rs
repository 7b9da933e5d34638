//! SQLite-backed export audit trail.

use diesel::prelude::*;

use super::{parse_date, parse_ts};
use crate::db::model::ExportAuditRow;
use crate::db::schema::export_audit;
use crate::db::DbPool;
use crate::domain::{ExportAuditRecord, MergeSummary};
use crate::error::{Error, Result};
use crate::port::store::AuditStore;

/// Append-only audit rows, one per publish invocation.
pub struct SqliteAuditStore {
    pool: DbPool,
}

impl SqliteAuditStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &ExportAuditRecord) -> ExportAuditRow {
        ExportAuditRow {
            export_id: record.export_id.clone(),
            game_date: record.game_date.to_string(),
            total_count: record.summary.total as i32,
            algorithm_count: record.summary.algorithm as i32,
            manual_count: record.summary.manual as i32,
            locked_count: record.summary.locked as i32,
            new_count: record.summary.new as i32,
            dropped_count: record.summary.dropped as i32,
            picks_snapshot: record.picks_snapshot.clone(),
            trigger_source: record.trigger_source.as_str().to_string(),
            created_at: record.created_at.to_rfc3339(),
        }
    }

    fn from_row(row: ExportAuditRow) -> Result<ExportAuditRecord> {
        Ok(ExportAuditRecord {
            export_id: row.export_id,
            game_date: parse_date(&row.game_date)?,
            summary: MergeSummary {
                total: row.total_count.max(0) as usize,
                algorithm: row.algorithm_count.max(0) as usize,
                manual: row.manual_count.max(0) as usize,
                locked: row.locked_count.max(0) as usize,
                new: row.new_count.max(0) as usize,
                dropped: row.dropped_count.max(0) as usize,
            },
            picks_snapshot: row.picks_snapshot,
            trigger_source: row.trigger_source.parse()?,
            created_at: parse_ts(&row.created_at)?,
        })
    }

    /// All audit rows for operator inspection, newest first.
    pub fn recent(&self, limit: i64) -> Result<Vec<ExportAuditRecord>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<ExportAuditRow> = export_audit::table
            .order(export_audit::created_at.desc())
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}

impl AuditStore for SqliteAuditStore {
    async fn append(&self, record: &ExportAuditRecord) -> Result<()> {
        let row = Self::to_row(record);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(export_audit::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}
