//! SQLite mirror of circuit breaker state.

use diesel::prelude::*;

use super::{parse_ts, parse_ts_opt};
use crate::db::model::CircuitStateRow;
use crate::db::schema::circuit_state;
use crate::db::DbPool;
use crate::domain::CircuitStatus;
use crate::error::{Error, Result};
use crate::port::store::CircuitStateStore;

/// Durable circuit-state rows for external monitoring.
///
/// Written on every transition; the in-memory registry remains the source
/// of truth for gating decisions.
pub struct SqliteCircuitStore {
    pool: DbPool,
}

impl SqliteCircuitStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(status: &CircuitStatus) -> CircuitStateRow {
        CircuitStateRow {
            circuit_key: status.key.clone(),
            state: status.state.as_str().to_string(),
            failure_count: status.failure_count as i32,
            threshold: status.threshold as i32,
            timeout_seconds: status.timeout_seconds as i32,
            opened_at: status.opened_at.map(|t| t.to_rfc3339()),
            last_success: status.last_success.map(|t| t.to_rfc3339()),
            last_failure: status.last_failure.map(|t| t.to_rfc3339()),
            last_error: status.last_error.clone(),
            updated_at: status.updated_at.to_rfc3339(),
        }
    }

    fn from_row(row: CircuitStateRow) -> Result<CircuitStatus> {
        Ok(CircuitStatus {
            key: row.circuit_key,
            state: row.state.parse()?,
            failure_count: row.failure_count.max(0) as u32,
            threshold: row.threshold.max(0) as u32,
            timeout_seconds: row.timeout_seconds.max(0) as u64,
            opened_at: parse_ts_opt(row.opened_at.as_deref())?,
            last_success: parse_ts_opt(row.last_success.as_deref())?,
            last_failure: parse_ts_opt(row.last_failure.as_deref())?,
            last_error: row.last_error,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

impl CircuitStateStore for SqliteCircuitStore {
    fn upsert(&self, status: &CircuitStatus) -> Result<()> {
        let row = Self::to_row(status);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(circuit_state::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    fn load_all(&self) -> Result<Vec<CircuitStatus>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<CircuitStateRow> = circuit_state::table
            .order(circuit_state::circuit_key.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
