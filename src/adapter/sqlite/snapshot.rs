//! SQLite-backed locked snapshot store.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::{angles_to_json, sources::SqliteSources};
use crate::db::model::PublishedPickRow;
use crate::db::schema::published_picks;
use crate::db::DbPool;
use crate::domain::{PickSource, PublishedPick};
use crate::error::{Error, Result};
use crate::port::store::SnapshotStore;

/// Owns the `published_picks` partition for each date.
pub struct SqliteSnapshotStore {
    pool: DbPool,
}

impl SqliteSnapshotStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &PublishedPick) -> Result<PublishedPickRow> {
        let pick = &record.pick;
        Ok(PublishedPickRow {
            game_date: pick.game_date.to_string(),
            player_lookup: pick.player_lookup.clone(),
            game_id: pick.game_id.as_str().to_string(),
            player_name: pick.player_name.clone(),
            team_abbr: pick.team_abbr.clone(),
            opponent_abbr: pick.opponent_abbr.clone(),
            recommendation: pick.recommendation.as_str().to_string(),
            line_value: pick.line_value.to_string(),
            edge: pick.edge.to_string(),
            rank: pick.rank.unwrap_or(0) as i32,
            pick_angles: angles_to_json(&pick.pick_angles)?,
            predicted_points: pick.predicted_points.map(|p| p.to_string()),
            ultra_tier: i32::from(pick.ultra_tier),
            source: record.source.as_str().to_string(),
            prediction_correct: pick.grading.prediction_correct.map(i32::from),
            actual_points: pick.grading.actual_points.map(|p| p.to_string()),
            is_voided: i32::from(pick.grading.is_voided),
            void_reason: pick.grading.void_reason.clone(),
            first_published_at: record.first_published_at.to_rfc3339(),
            last_seen_in_signal: record.last_seen_in_signal.map(|t| t.to_rfc3339()),
            updated_at: record.updated_at.to_rfc3339(),
        })
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    async fn replace_day(&self, date: NaiveDate, rows: &[PublishedPick]) -> Result<()> {
        let new_rows: Vec<PublishedPickRow> =
            rows.iter().map(Self::to_row).collect::<Result<_>>()?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        // Delete-and-insert inside one transaction: the partition swap is
        // all-or-nothing, so a half-written day is never visible.
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(
                published_picks::table.filter(published_picks::game_date.eq(date.to_string())),
            )
            .execute(conn)?;
            diesel::insert_into(published_picks::table)
                .values(&new_rows)
                .execute(conn)?;
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn day(&self, date: NaiveDate) -> Result<Vec<PublishedPick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<PublishedPickRow> = published_picks::table
            .filter(published_picks::game_date.eq(date.to_string()))
            .order(published_picks::rank.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter()
            .map(SqliteSources::published_from_row)
            .collect()
    }

    async fn graded_history(&self) -> Result<Vec<PublishedPick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<PublishedPickRow> = published_picks::table
            .filter(
                published_picks::prediction_correct
                    .is_not_null()
                    .or(published_picks::is_voided.eq(1)),
            )
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter()
            .map(SqliteSources::published_from_row)
            .collect()
    }

    async fn delete_manual(&self, date: NaiveDate, player_lookup: &str) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let deleted = diesel::delete(
            published_picks::table
                .filter(published_picks::game_date.eq(date.to_string()))
                .filter(published_picks::player_lookup.eq(player_lookup))
                .filter(published_picks::source.eq(PickSource::Manual.as_str())),
        )
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::sqlite::test_db;
    use crate::testkit::picks::published_pick;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        "2026-08-05".parse().unwrap()
    }

    #[tokio::test]
    async fn roundtrips_a_day() {
        let store = SqliteSnapshotStore::new(test_db::setup());
        let rows = vec![
            published_pick("smith-j", "20260805_BOS_LAL")
                .rank(1)
                .line(dec!(25.5))
                .ultra()
                .build(),
            published_pick("jones-t", "20260805_NYK_MIA").rank(2).build(),
        ];

        store.replace_day(date(), &rows).await.unwrap();
        let loaded = store.day(date()).await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].pick.player_lookup, "smith-j");
        assert_eq!(loaded[0].pick.line_value, dec!(25.5));
        assert!(loaded[0].pick.ultra_tier);
        assert_eq!(loaded[1].pick.rank, Some(2));
    }

    #[tokio::test]
    async fn replace_day_overwrites_whole_partition() {
        let store = SqliteSnapshotStore::new(test_db::setup());
        let first = vec![
            published_pick("old-a", "20260805_BOS_LAL").rank(1).build(),
            published_pick("old-b", "20260805_BOS_LAL").rank(2).build(),
        ];
        store.replace_day(date(), &first).await.unwrap();

        let second = vec![published_pick("new-a", "20260805_BOS_LAL").rank(1).build()];
        store.replace_day(date(), &second).await.unwrap();

        let loaded = store.day(date()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].pick.player_lookup, "new-a");
    }

    #[tokio::test]
    async fn graded_history_filters_ungraded() {
        let store = SqliteSnapshotStore::new(test_db::setup());
        let rows = vec![
            published_pick("graded", "20260805_BOS_LAL").rank(1).graded(true).build(),
            published_pick("pending", "20260805_BOS_LAL").rank(2).build(),
        ];
        store.replace_day(date(), &rows).await.unwrap();

        let history = store.graded_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].pick.player_lookup, "graded");
    }

    #[tokio::test]
    async fn delete_manual_only_touches_manual_rows() {
        let store = SqliteSnapshotStore::new(test_db::setup());
        let rows = vec![
            published_pick("algo", "20260805_BOS_LAL").rank(1).build(),
            published_pick("human", "20260805_BOS_LAL").rank(2).manual().build(),
        ];
        store.replace_day(date(), &rows).await.unwrap();

        assert!(!store.delete_manual(date(), "algo").await.unwrap());
        assert!(store.delete_manual(date(), "human").await.unwrap());
        assert_eq!(store.day(date()).await.unwrap().len(), 1);
    }
}
