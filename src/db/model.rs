//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{
    circuit_state, export_audit, games, manual_picks, published_picks, signal_picks,
};

/// Database row for a signal pick (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = signal_picks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SignalPickRow {
    pub id: Option<i32>,
    pub player_lookup: String,
    pub game_id: String,
    pub game_date: String,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: String,
    pub line_value: String,
    pub edge: String,
    pub rank: Option<i32>,
    pub pick_angles: String,
    pub predicted_points: Option<String>,
    pub ultra_tier: String,
    pub source: String,
    pub prediction_correct: Option<i32>,
    pub actual_points: Option<String>,
    pub is_voided: i32,
    pub void_reason: Option<String>,
    pub created_at: String,
}

/// Database row for a signal pick (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = signal_picks)]
pub struct NewSignalPickRow {
    pub player_lookup: String,
    pub game_id: String,
    pub game_date: String,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: String,
    pub line_value: String,
    pub edge: String,
    pub rank: Option<i32>,
    pub pick_angles: String,
    pub predicted_points: Option<String>,
    pub ultra_tier: String,
    pub source: String,
    pub prediction_correct: Option<i32>,
    pub actual_points: Option<String>,
    pub is_voided: i32,
    pub void_reason: Option<String>,
    pub created_at: String,
}

/// Database row for a locked published pick.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = published_picks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PublishedPickRow {
    pub game_date: String,
    pub player_lookup: String,
    pub game_id: String,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: String,
    pub line_value: String,
    pub edge: String,
    pub rank: i32,
    pub pick_angles: String,
    pub predicted_points: Option<String>,
    pub ultra_tier: i32,
    pub source: String,
    pub prediction_correct: Option<i32>,
    pub actual_points: Option<String>,
    pub is_voided: i32,
    pub void_reason: Option<String>,
    pub first_published_at: String,
    pub last_seen_in_signal: Option<String>,
    pub updated_at: String,
}

/// Database row for a manual pick (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = manual_picks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ManualPickRow {
    pub id: Option<i32>,
    pub game_date: String,
    pub player_lookup: String,
    pub game_id: String,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: String,
    pub line_value: String,
    pub edge: Option<String>,
    pub pick_angles: String,
    pub ultra_tier: i32,
    pub is_active: i32,
    pub added_by: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Database row for a manual pick (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = manual_picks)]
pub struct NewManualPickRow {
    pub game_date: String,
    pub player_lookup: String,
    pub game_id: String,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: String,
    pub line_value: String,
    pub edge: Option<String>,
    pub pick_angles: String,
    pub ultra_tier: i32,
    pub is_active: i32,
    pub added_by: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Database row for an export audit record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = export_audit)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExportAuditRow {
    pub export_id: String,
    pub game_date: String,
    pub total_count: i32,
    pub algorithm_count: i32,
    pub manual_count: i32,
    pub locked_count: i32,
    pub new_count: i32,
    pub dropped_count: i32,
    pub picks_snapshot: String,
    pub trigger_source: String,
    pub created_at: String,
}

/// Database row for a mirrored circuit state.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = circuit_state)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CircuitStateRow {
    pub circuit_key: String,
    pub state: String,
    pub failure_count: i32,
    pub threshold: i32,
    pub timeout_seconds: i32,
    pub opened_at: Option<String>,
    pub last_success: Option<String>,
    pub last_failure: Option<String>,
    pub last_error: Option<String>,
    pub updated_at: String,
}

/// Database row for a game's schedule status.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    pub game_id: String,
    pub game_date: String,
    pub status: String,
}
