//! Core pick types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::game::GameId;
use crate::error::Error;

/// Source identifier stamped on synthetic signal rows injected for manual
/// picks, so the regular merge path picks them up uniformly and the remove
/// command can find them again.
pub const MANUAL_SYSTEM_SOURCE: &str = "manual_system";

/// Over/under direction of a player-prop recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Over,
    Under,
}

impl Recommendation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Over => "OVER",
            Recommendation::Under => "UNDER",
        }
    }
}

impl std::str::FromStr for Recommendation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OVER" => Ok(Recommendation::Over),
            "UNDER" => Ok(Recommendation::Under),
            other => Err(Error::Parse(format!("unknown recommendation '{other}'"))),
        }
    }
}

/// Final attribution of a merged pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickSource {
    Algorithm,
    Manual,
}

impl PickSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PickSource::Algorithm => "algorithm",
            PickSource::Manual => "manual",
        }
    }
}

impl std::str::FromStr for PickSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "algorithm" => Ok(PickSource::Algorithm),
            "manual" => Ok(PickSource::Manual),
            other => Err(Error::Parse(format!("unknown pick source '{other}'"))),
        }
    }
}

/// Post-game grading outcome for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PickResult {
    Win,
    Loss,
    Void,
}

impl PickResult {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PickResult::Win => "WIN",
            PickResult::Loss => "LOSS",
            PickResult::Void => "VOID",
        }
    }
}

/// Grading fields written by the post-game grading job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grading {
    pub prediction_correct: Option<bool>,
    pub actual_points: Option<Decimal>,
    pub is_voided: bool,
    pub void_reason: Option<String>,
}

impl Grading {
    /// Derive the display result. Voids win over grading; ungraded picks
    /// have no result yet.
    #[must_use]
    pub fn result(&self) -> Option<PickResult> {
        if self.is_voided {
            return Some(PickResult::Void);
        }
        self.prediction_correct.map(|correct| {
            if correct {
                PickResult::Win
            } else {
                PickResult::Loss
            }
        })
    }
}

/// A single player-prop recommendation for one game on one date.
///
/// At most one active pick per (`player_lookup`, `game_date`) exists in the
/// published set; the merge engine enforces this by keying on
/// `player_lookup` within a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Stable player key.
    pub player_lookup: String,
    pub game_id: GameId,
    pub game_date: NaiveDate,
    pub player_name: String,
    pub team_abbr: String,
    pub opponent_abbr: String,
    pub recommendation: Recommendation,
    pub line_value: Decimal,
    pub edge: Decimal,
    /// Display order; reassigned on every merge.
    pub rank: Option<u32>,
    /// Short textual justifications, capped to 3 for display.
    pub pick_angles: Vec<String>,
    pub predicted_points: Option<Decimal>,
    /// Premium tier flag, normalized to a plain bool at the read boundary.
    pub ultra_tier: bool,
    pub grading: Grading,
}

/// Normalize the legacy string representation of the premium flag.
///
/// Older signal rows carry `"true"`/`"false"` text (occasionally `"1"`);
/// newer ones a real boolean. Anything unrecognized is not premium.
#[must_use]
pub fn normalize_ultra_text(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
