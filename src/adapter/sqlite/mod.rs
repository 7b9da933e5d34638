//! SQLite adapters using Diesel.
//!
//! Timestamps are stored as RFC 3339 text and decimals as text, parsed
//! back at the read boundary. The legacy boolean-or-string premium flag on
//! signal rows is normalized here and nowhere else.

pub mod audit;
pub mod circuit;
pub mod manual;
pub mod probe;
pub mod snapshot;
pub mod sources;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::error::{Error, Result};

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.parse()
        .map_err(|e| Error::Parse(format!("bad date '{raw}': {e}")))
}

pub(crate) fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("bad timestamp '{raw}': {e}")))
}

pub(crate) fn parse_ts_opt(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(parse_ts).transpose()
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal> {
    raw.parse()
        .map_err(|e| Error::Parse(format!("bad decimal '{raw}': {e}")))
}

pub(crate) fn parse_decimal_opt(raw: Option<&str>) -> Result<Option<Decimal>> {
    raw.map(parse_decimal).transpose()
}

pub(crate) fn angles_from_json(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| Error::Parse(e.to_string()))
}

pub(crate) fn angles_to_json(angles: &[String]) -> Result<String> {
    serde_json::to_string(angles).map_err(|e| Error::Parse(e.to_string()))
}

pub(crate) fn flag(value: i32) -> bool {
    value != 0
}

pub(crate) fn flag_opt(value: Option<i32>) -> Option<bool> {
    value.map(flag)
}

#[cfg(test)]
pub(crate) mod test_db {
    use diesel_migrations::MigrationHarness;

    use crate::db::{create_pool, DbPool, MIGRATIONS};

    pub fn setup() -> DbPool {
        let pool = create_pool(":memory:").expect("Failed to create pool");
        let mut conn = pool.get().expect("Failed to get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
        pool
    }
}
