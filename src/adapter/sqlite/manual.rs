//! Operator write-side for manual picks.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::{angles_to_json, sources::SqliteSources};
use crate::db::model::{ManualPickRow, NewManualPickRow, NewSignalPickRow};
use crate::db::schema::{manual_picks, signal_picks};
use crate::db::DbPool;
use crate::domain::{ManualPick, MANUAL_SYSTEM_SOURCE};
use crate::error::{Error, Result};

/// Manages the `manual_picks` table and the synthetic signal rows that
/// shadow each manual entry.
///
/// Adding a pick writes both the manual row and a signal row tagged with
/// the `manual_system` source, so the regular merge path carries the entry
/// like any other signal pick. Removing reverses both; the caller also
/// deletes the manual-sourced locked row so the locking mechanism cannot
/// resurrect the pick on the next run.
pub struct SqliteManualPicks {
    pool: DbPool,
}

impl SqliteManualPicks {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert the manual pick and its synthetic signal twin.
    pub fn add(&self, manual: &ManualPick) -> Result<()> {
        let pick = &manual.pick;
        let angles = angles_to_json(&pick.pick_angles)?;
        let manual_row = NewManualPickRow {
            game_date: pick.game_date.to_string(),
            player_lookup: pick.player_lookup.clone(),
            game_id: pick.game_id.as_str().to_string(),
            player_name: pick.player_name.clone(),
            team_abbr: pick.team_abbr.clone(),
            opponent_abbr: pick.opponent_abbr.clone(),
            recommendation: pick.recommendation.as_str().to_string(),
            line_value: pick.line_value.to_string(),
            edge: Some(pick.edge.to_string()),
            pick_angles: angles.clone(),
            ultra_tier: i32::from(pick.ultra_tier),
            is_active: 1,
            added_by: manual.added_by.clone(),
            notes: manual.notes.clone(),
            created_at: manual.created_at.to_rfc3339(),
        };
        let signal_row = NewSignalPickRow {
            player_lookup: pick.player_lookup.clone(),
            game_id: pick.game_id.as_str().to_string(),
            game_date: pick.game_date.to_string(),
            player_name: pick.player_name.clone(),
            team_abbr: pick.team_abbr.clone(),
            opponent_abbr: pick.opponent_abbr.clone(),
            recommendation: pick.recommendation.as_str().to_string(),
            line_value: pick.line_value.to_string(),
            edge: pick.edge.to_string(),
            rank: None,
            pick_angles: angles,
            predicted_points: None,
            ultra_tier: pick.ultra_tier.to_string(),
            source: MANUAL_SYSTEM_SOURCE.to_string(),
            prediction_correct: None,
            actual_points: None,
            is_voided: 0,
            void_reason: None,
            created_at: manual.created_at.to_rfc3339(),
        };

        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(manual_picks::table)
                .values(&manual_row)
                .execute(conn)?;
            diesel::insert_into(signal_picks::table)
                .values(&signal_row)
                .execute(conn)?;
            Ok(())
        })
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    /// Soft-delete the manual rows for (`date`, `player_lookup`) and drop
    /// the synthetic signal twin. Returns whether anything was deactivated.
    pub fn remove(&self, date: NaiveDate, player_lookup: &str) -> Result<bool> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let deactivated = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let deactivated = diesel::update(
                    manual_picks::table
                        .filter(manual_picks::game_date.eq(date.to_string()))
                        .filter(manual_picks::player_lookup.eq(player_lookup))
                        .filter(manual_picks::is_active.eq(1)),
                )
                .set(manual_picks::is_active.eq(0))
                .execute(conn)?;

                diesel::delete(
                    signal_picks::table
                        .filter(signal_picks::game_date.eq(date.to_string()))
                        .filter(signal_picks::player_lookup.eq(player_lookup))
                        .filter(signal_picks::source.eq(MANUAL_SYSTEM_SOURCE)),
                )
                .execute(conn)?;

                Ok(deactivated)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deactivated > 0)
    }

    /// Active manual picks for a date, for operator listing.
    pub fn list(&self, date: NaiveDate) -> Result<Vec<ManualPick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<ManualPickRow> = manual_picks::table
            .filter(manual_picks::game_date.eq(date.to_string()))
            .filter(manual_picks::is_active.eq(1))
            .order(manual_picks::created_at.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter()
            .map(SqliteSources::manual_from_row)
            .collect()
    }
}
