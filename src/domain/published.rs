//! The locked, previously-published representation of a pick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pick::{Pick, PickSource};

/// One durable row of the locked snapshot, per (`game_date`, `player_lookup`).
///
/// Once written, the row is the baseline for every future merge of that
/// date. The whole date partition is atomically replaced on each publish;
/// there is no per-row update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedPick {
    pub pick: Pick,
    pub source: PickSource,
    /// Set when the pick first entered the published set; never changes.
    pub first_published_at: DateTime<Utc>,
    /// Last time the algorithmic feed still returned this player.
    /// Stays at its old value once the feed drops the pick.
    pub last_seen_in_signal: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PublishedPick {
    #[must_use]
    pub fn player_lookup(&self) -> &str {
        &self.pick.player_lookup
    }
}
