//! Operator-curated pick overrides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pick::Pick;

/// A human-curated override consumed read-only by the merge engine.
///
/// Removal is a soft delete (`is_active = false`) so the audit trail of
/// what an operator entered survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPick {
    pub pick: Pick,
    pub added_by: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ManualPick {
    #[must_use]
    pub fn player_lookup(&self) -> &str {
        &self.pick.player_lookup
    }
}
