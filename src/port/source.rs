//! Read contracts against the warehouse.
//!
//! These are query contracts, not schemas: the engine only consumes rows.
//! Every reader is independent so a failed source can degrade to empty
//! without touching the others.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{GameId, ManualPick, Pick, PublishedPick};
use crate::error::Result;

/// The four independent reads feeding one merge pass.
#[async_trait]
pub trait PickSources: Send + Sync {
    /// Fresh algorithmic output for the date, keyed by `player_lookup`.
    async fn signal_picks(&self, date: NaiveDate) -> Result<Vec<Pick>>;

    /// The locked snapshot previously published for the date.
    async fn published_picks(&self, date: NaiveDate) -> Result<Vec<PublishedPick>>;

    /// Active manual overrides for the date.
    async fn manual_picks(&self, date: NaiveDate) -> Result<Vec<ManualPick>>;

    /// Game ids for the date whose status is in-progress or later.
    async fn started_game_ids(&self, date: NaiveDate) -> Result<HashSet<GameId>>;
}

/// Answer from an upstream-availability probe.
///
/// Only an explicit `Available` may auto-reset an open circuit; anything
/// else means "cannot determine, do not reset".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Available,
    Unavailable,
    Unknown,
}

/// Caller-supplied, inexpensive existence check for an upstream dependency.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn check(&self, key: &str) -> Result<ProbeOutcome>;
}
