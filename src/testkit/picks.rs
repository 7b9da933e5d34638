//! Builders for picks in all three source shapes.
//!
//! Defaults are deliberately boring: an OVER 20.5 with a one-point edge,
//! unranked, not premium, ungraded. Tests override only what they assert.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    GameId, Grading, ManualPick, Pick, PickSource, PublishedPick, Recommendation,
};

/// Builder for a raw [`Pick`] as the signal feed would return it.
#[derive(Debug, Clone)]
pub struct PickBuilder {
    pick: Pick,
}

/// Start building a signal-shaped pick.
#[must_use]
pub fn signal_pick(player_lookup: &str, game_id: &str) -> PickBuilder {
    let game_id = GameId::new(game_id);
    let game_date = game_id
        .parts()
        .map(|p| p.date)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
    PickBuilder {
        pick: Pick {
            player_lookup: player_lookup.to_string(),
            game_id,
            game_date,
            player_name: player_lookup.to_string(),
            team_abbr: "BOS".to_string(),
            opponent_abbr: "LAL".to_string(),
            recommendation: Recommendation::Over,
            line_value: dec!(20.5),
            edge: dec!(1.0),
            rank: None,
            pick_angles: Vec::new(),
            predicted_points: None,
            ultra_tier: false,
            grading: Grading::default(),
        },
    }
}

impl PickBuilder {
    #[must_use]
    pub fn line(mut self, line: Decimal) -> Self {
        self.pick.line_value = line;
        self
    }

    #[must_use]
    pub fn edge(mut self, edge: Decimal) -> Self {
        self.pick.edge = edge;
        self
    }

    #[must_use]
    pub fn rank(mut self, rank: u32) -> Self {
        self.pick.rank = Some(rank);
        self
    }

    #[must_use]
    pub fn angles(mut self, angles: &[&str]) -> Self {
        self.pick.pick_angles = angles.iter().map(|a| (*a).to_string()).collect();
        self
    }

    #[must_use]
    pub fn ultra(mut self) -> Self {
        self.pick.ultra_tier = true;
        self
    }

    #[must_use]
    pub fn under(mut self) -> Self {
        self.pick.recommendation = Recommendation::Under;
        self
    }

    #[must_use]
    pub fn team(mut self, team: &str) -> Self {
        self.pick.team_abbr = team.to_string();
        self
    }

    #[must_use]
    pub fn opponent(mut self, opponent: &str) -> Self {
        self.pick.opponent_abbr = opponent.to_string();
        self
    }

    #[must_use]
    pub fn predicted(mut self, points: Decimal) -> Self {
        self.pick.predicted_points = Some(points);
        self
    }

    #[must_use]
    pub fn graded(mut self, correct: bool) -> Self {
        self.pick.grading.prediction_correct = Some(correct);
        self
    }

    #[must_use]
    pub fn voided(mut self, reason: &str) -> Self {
        self.pick.grading.is_voided = true;
        self.pick.grading.void_reason = Some(reason.to_string());
        self
    }

    #[must_use]
    pub fn build(self) -> Pick {
        self.pick
    }
}

/// Builder for a locked [`PublishedPick`].
#[derive(Debug, Clone)]
pub struct PublishedPickBuilder {
    inner: PickBuilder,
    source: PickSource,
}

/// Start building a published (locked) pick.
#[must_use]
pub fn published_pick(player_lookup: &str, game_id: &str) -> PublishedPickBuilder {
    PublishedPickBuilder {
        inner: signal_pick(player_lookup, game_id).rank(1),
        source: PickSource::Algorithm,
    }
}

impl PublishedPickBuilder {
    #[must_use]
    pub fn line(mut self, line: Decimal) -> Self {
        self.inner = self.inner.line(line);
        self
    }

    #[must_use]
    pub fn edge(mut self, edge: Decimal) -> Self {
        self.inner = self.inner.edge(edge);
        self
    }

    #[must_use]
    pub fn rank(mut self, rank: u32) -> Self {
        self.inner = self.inner.rank(rank);
        self
    }

    #[must_use]
    pub fn angles(mut self, angles: &[&str]) -> Self {
        self.inner = self.inner.angles(angles);
        self
    }

    #[must_use]
    pub fn ultra(mut self) -> Self {
        self.inner = self.inner.ultra();
        self
    }

    #[must_use]
    pub fn team(mut self, team: &str) -> Self {
        self.inner = self.inner.team(team);
        self
    }

    #[must_use]
    pub fn opponent(mut self, opponent: &str) -> Self {
        self.inner = self.inner.opponent(opponent);
        self
    }

    #[must_use]
    pub fn graded(mut self, correct: bool) -> Self {
        self.inner = self.inner.graded(correct);
        self
    }

    #[must_use]
    pub fn manual(mut self) -> Self {
        self.source = PickSource::Manual;
        self
    }

    #[must_use]
    pub fn build(self) -> PublishedPick {
        let published_at: DateTime<Utc> = "2026-08-04T00:00:00Z".parse().unwrap();
        PublishedPick {
            pick: self.inner.build(),
            source: self.source,
            first_published_at: published_at,
            last_seen_in_signal: Some(published_at),
            updated_at: published_at,
        }
    }
}

/// Builder for a [`ManualPick`] override.
#[derive(Debug, Clone)]
pub struct ManualPickBuilder {
    inner: PickBuilder,
}

/// Start building an active manual pick.
#[must_use]
pub fn manual_pick(player_lookup: &str, game_id: &str) -> ManualPickBuilder {
    ManualPickBuilder {
        inner: signal_pick(player_lookup, game_id),
    }
}

impl ManualPickBuilder {
    #[must_use]
    pub fn line(mut self, line: Decimal) -> Self {
        self.inner = self.inner.line(line);
        self
    }

    #[must_use]
    pub fn edge(mut self, edge: Decimal) -> Self {
        self.inner = self.inner.edge(edge);
        self
    }

    #[must_use]
    pub fn under(mut self) -> Self {
        self.inner = self.inner.under();
        self
    }

    #[must_use]
    pub fn ultra(mut self) -> Self {
        self.inner = self.inner.ultra();
        self
    }

    #[must_use]
    pub fn build(self) -> ManualPick {
        ManualPick {
            pick: self.inner.build(),
            added_by: "tester".to_string(),
            notes: None,
            is_active: true,
            created_at: "2026-08-05T00:00:00Z".parse().unwrap(),
        }
    }
}
