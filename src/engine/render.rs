//! Public JSON payload shaping.
//!
//! Projects merged picks into the artifact the web frontend consumes.
//! Internal bookkeeping (in-signal flags, first-published timestamps)
//! never leaves this boundary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::merge::MergeOutcome;
use super::records::{self, DayRecord, RecordSummary, Streak, WeekRecord};
use crate::domain::{MergeSummary, PickResult, PublishedPick, Recommendation};

/// Angles shown per pick; extra justifications are dropped from display.
pub const MAX_DISPLAY_ANGLES: usize = 3;

/// One pick as the frontend sees it.
#[derive(Debug, Clone, Serialize)]
pub struct PickPayload {
    pub rank: u32,
    pub player: String,
    pub team: String,
    pub opponent: String,
    /// Whether the player's team is the home side; false when the game id
    /// cannot be parsed.
    pub home: bool,
    pub direction: Recommendation,
    pub line: Decimal,
    pub edge: Decimal,
    pub angles: Vec<String>,
    pub result: Option<PickResult>,
    pub is_ultra: bool,
}

/// The full per-date artifact.
#[derive(Debug, Clone, Serialize)]
pub struct DayArtifact {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub summary: MergeSummary,
    pub record: RecordSummary,
    pub streak: Option<Streak>,
    pub daily: Vec<DayRecord>,
    pub weekly: Vec<WeekRecord>,
    pub picks: Vec<PickPayload>,
}

/// Project one locked pick into its public shape.
#[must_use]
pub fn pick_payload(record: &PublishedPick) -> PickPayload {
    let pick = &record.pick;
    PickPayload {
        rank: pick.rank.unwrap_or(0),
        player: pick.player_name.clone(),
        team: pick.team_abbr.clone(),
        opponent: pick.opponent_abbr.clone(),
        home: pick.game_id.is_home(&pick.team_abbr),
        direction: pick.recommendation,
        line: pick.line_value,
        edge: pick.edge,
        angles: pick
            .pick_angles
            .iter()
            .take(MAX_DISPLAY_ANGLES)
            .cloned()
            .collect(),
        result: pick.grading.result(),
        is_ultra: pick.ultra_tier,
    }
}

/// Render the artifact for one merge run against the graded history.
#[must_use]
pub fn day_artifact(
    date: NaiveDate,
    outcome: &MergeOutcome,
    history: &[PublishedPick],
    generated_at: DateTime<Utc>,
) -> DayArtifact {
    DayArtifact {
        date,
        generated_at,
        summary: outcome.summary,
        record: records::season_record(history),
        streak: records::current_streak(history),
        daily: records::daily_records(history),
        weekly: records::weekly_records(history),
        picks: outcome
            .picks
            .iter()
            .map(|p| pick_payload(&p.record))
            .collect(),
    }
}

/// Artifact object name for a date.
#[must_use]
pub fn artifact_name(date: NaiveDate) -> String {
    format!("best_picks_{date}.json")
}
