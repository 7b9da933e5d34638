//! SQLite-backed implementation of the warehouse read contracts.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;

use super::{
    angles_from_json, flag, flag_opt, parse_date, parse_decimal, parse_decimal_opt, parse_ts,
    parse_ts_opt,
};
use crate::db::model::{ManualPickRow, PublishedPickRow, SignalPickRow};
use crate::db::schema::{games, manual_picks, published_picks, signal_picks};
use crate::db::DbPool;
use crate::domain::{
    normalize_ultra_text, GameId, Grading, ManualPick, Pick, PublishedPick,
};
use crate::error::{Error, Result};
use crate::port::source::PickSources;

/// Game statuses counted as started for the premium gate.
const STARTED_STATUSES: [&str; 2] = ["in_progress", "final"];

/// Reads all four pick sources from the local SQLite warehouse mirror.
pub struct SqliteSources {
    pool: DbPool,
}

impl SqliteSources {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn signal_from_row(row: SignalPickRow) -> Result<Pick> {
        Ok(Pick {
            player_lookup: row.player_lookup,
            game_id: GameId::new(row.game_id),
            game_date: parse_date(&row.game_date)?,
            player_name: row.player_name,
            team_abbr: row.team_abbr,
            opponent_abbr: row.opponent_abbr,
            recommendation: row.recommendation.parse()?,
            line_value: parse_decimal(&row.line_value)?,
            edge: parse_decimal(&row.edge)?,
            rank: row.rank.map(|r| r.max(0) as u32),
            pick_angles: angles_from_json(&row.pick_angles)?,
            predicted_points: parse_decimal_opt(row.predicted_points.as_deref())?,
            // Legacy dual representation normalized here, once.
            ultra_tier: normalize_ultra_text(&row.ultra_tier),
            grading: Grading {
                prediction_correct: flag_opt(row.prediction_correct),
                actual_points: parse_decimal_opt(row.actual_points.as_deref())?,
                is_voided: flag(row.is_voided),
                void_reason: row.void_reason,
            },
        })
    }

    pub(crate) fn published_from_row(row: PublishedPickRow) -> Result<PublishedPick> {
        Ok(PublishedPick {
            pick: Pick {
                player_lookup: row.player_lookup,
                game_id: GameId::new(row.game_id),
                game_date: parse_date(&row.game_date)?,
                player_name: row.player_name,
                team_abbr: row.team_abbr,
                opponent_abbr: row.opponent_abbr,
                recommendation: row.recommendation.parse()?,
                line_value: parse_decimal(&row.line_value)?,
                edge: parse_decimal(&row.edge)?,
                rank: Some(row.rank.max(0) as u32),
                pick_angles: angles_from_json(&row.pick_angles)?,
                predicted_points: parse_decimal_opt(row.predicted_points.as_deref())?,
                ultra_tier: flag(row.ultra_tier),
                grading: Grading {
                    prediction_correct: flag_opt(row.prediction_correct),
                    actual_points: parse_decimal_opt(row.actual_points.as_deref())?,
                    is_voided: flag(row.is_voided),
                    void_reason: row.void_reason,
                },
            },
            source: row.source.parse()?,
            first_published_at: parse_ts(&row.first_published_at)?,
            last_seen_in_signal: parse_ts_opt(row.last_seen_in_signal.as_deref())?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }

    pub(crate) fn manual_from_row(row: ManualPickRow) -> Result<ManualPick> {
        Ok(ManualPick {
            pick: Pick {
                player_lookup: row.player_lookup,
                game_id: GameId::new(row.game_id),
                game_date: parse_date(&row.game_date)?,
                player_name: row.player_name,
                team_abbr: row.team_abbr,
                opponent_abbr: row.opponent_abbr,
                recommendation: row.recommendation.parse()?,
                line_value: parse_decimal(&row.line_value)?,
                edge: parse_decimal_opt(row.edge.as_deref())?.unwrap_or_default(),
                rank: None,
                pick_angles: angles_from_json(&row.pick_angles)?,
                predicted_points: None,
                ultra_tier: flag(row.ultra_tier),
                grading: Grading::default(),
            },
            added_by: row.added_by,
            notes: row.notes,
            is_active: flag(row.is_active),
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

#[async_trait]
impl PickSources for SqliteSources {
    async fn signal_picks(&self, date: NaiveDate) -> Result<Vec<Pick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<SignalPickRow> = signal_picks::table
            .filter(signal_picks::game_date.eq(date.to_string()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::signal_from_row).collect()
    }

    async fn published_picks(&self, date: NaiveDate) -> Result<Vec<PublishedPick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<PublishedPickRow> = published_picks::table
            .filter(published_picks::game_date.eq(date.to_string()))
            .order(published_picks::rank.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::published_from_row).collect()
    }

    async fn manual_picks(&self, date: NaiveDate) -> Result<Vec<ManualPick>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let rows: Vec<ManualPickRow> = manual_picks::table
            .filter(manual_picks::game_date.eq(date.to_string()))
            .filter(manual_picks::is_active.eq(1))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::manual_from_row).collect()
    }

    async fn started_game_ids(&self, date: NaiveDate) -> Result<HashSet<GameId>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let ids: Vec<String> = games::table
            .filter(games::game_date.eq(date.to_string()))
            .filter(games::status.eq_any(STARTED_STATUSES))
            .select(games::game_id)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(ids.into_iter().map(GameId::new).collect())
    }
}
