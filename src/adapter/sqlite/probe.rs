//! Upstream-availability probe over the warehouse tables.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::db::schema::{games, manual_picks, published_picks, signal_picks};
use crate::db::DbPool;
use crate::error::{Error, Result};
use crate::port::source::{AvailabilityProbe, ProbeOutcome};

/// Row-count probe for pipeline circuit keys.
///
/// Keys look like `warehouse:<source>:<date>`. A positive row count for
/// the source's table and date answers `Available`; zero answers
/// `Unavailable`; a key this probe does not understand answers `Unknown`
/// so the circuit is never reset on a guess.
pub struct SqliteAvailabilityProbe {
    pool: DbPool,
}

impl SqliteAvailabilityProbe {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn count_rows(&self, source: &str, date: NaiveDate) -> Result<Option<i64>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let date = date.to_string();

        let count = match source {
            "signal" => signal_picks::table
                .filter(signal_picks::game_date.eq(&date))
                .select(count_star())
                .first(&mut conn),
            "published" => published_picks::table
                .filter(published_picks::game_date.eq(&date))
                .select(count_star())
                .first(&mut conn),
            "manual" => manual_picks::table
                .filter(manual_picks::game_date.eq(&date))
                .select(count_star())
                .first(&mut conn),
            "game_status" => games::table
                .filter(games::game_date.eq(&date))
                .select(count_star())
                .first(&mut conn),
            _ => return Ok(None),
        };

        count
            .map(Some)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

#[async_trait]
impl AvailabilityProbe for SqliteAvailabilityProbe {
    async fn check(&self, key: &str) -> Result<ProbeOutcome> {
        let mut parts = key.splitn(3, ':');
        let (Some("warehouse"), Some(source), Some(date)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Ok(ProbeOutcome::Unknown);
        };
        let Ok(date) = date.parse::<NaiveDate>() else {
            return Ok(ProbeOutcome::Unknown);
        };

        match self.count_rows(source, date)? {
            Some(count) if count > 0 => Ok(ProbeOutcome::Available),
            Some(_) => Ok(ProbeOutcome::Unavailable),
            None => Ok(ProbeOutcome::Unknown),
        }
    }
}
