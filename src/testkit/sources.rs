//! Scriptable [`PickSources`] implementation.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{GameId, ManualPick, Pick, PublishedPick};
use crate::error::{Error, Result};
use crate::port::source::{AvailabilityProbe, PickSources, ProbeOutcome};

/// One scripted read: a canned value, or a scripted failure.
#[derive(Debug, Clone)]
enum ScriptedRead<T> {
    Value(T),
    Fail(String),
}

impl<T: Clone> ScriptedRead<T> {
    fn resolve(&self) -> Result<T> {
        match self {
            ScriptedRead::Value(v) => Ok(v.clone()),
            ScriptedRead::Fail(reason) => Err(Error::Database(reason.clone())),
        }
    }
}

/// A [`PickSources`] whose four reads are scripted per test.
///
/// All reads default to empty success; use the `with_*` methods to seed
/// data, the `failing_*` methods to script failures, and `with_delay` to
/// make every read slow enough to trip the caller's timeout.
pub struct ScriptedSources {
    signal: ScriptedRead<Vec<Pick>>,
    published: ScriptedRead<Vec<PublishedPick>>,
    manual: ScriptedRead<Vec<ManualPick>>,
    started: ScriptedRead<HashSet<GameId>>,
    delay: Option<Duration>,
}

impl Default for ScriptedSources {
    fn default() -> Self {
        Self {
            signal: ScriptedRead::Value(Vec::new()),
            published: ScriptedRead::Value(Vec::new()),
            manual: ScriptedRead::Value(Vec::new()),
            started: ScriptedRead::Value(HashSet::new()),
            delay: None,
        }
    }
}

impl ScriptedSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_signal(mut self, picks: Vec<Pick>) -> Self {
        self.signal = ScriptedRead::Value(picks);
        self
    }

    #[must_use]
    pub fn with_published(mut self, picks: Vec<PublishedPick>) -> Self {
        self.published = ScriptedRead::Value(picks);
        self
    }

    #[must_use]
    pub fn with_manual(mut self, picks: Vec<ManualPick>) -> Self {
        self.manual = ScriptedRead::Value(picks);
        self
    }

    #[must_use]
    pub fn with_started(mut self, ids: impl IntoIterator<Item = GameId>) -> Self {
        self.started = ScriptedRead::Value(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn failing_signal(mut self, reason: &str) -> Self {
        self.signal = ScriptedRead::Fail(reason.to_string());
        self
    }

    #[must_use]
    pub fn failing_published(mut self, reason: &str) -> Self {
        self.published = ScriptedRead::Fail(reason.to_string());
        self
    }

    #[must_use]
    pub fn failing_manual(mut self, reason: &str) -> Self {
        self.manual = ScriptedRead::Fail(reason.to_string());
        self
    }

    #[must_use]
    pub fn failing_started(mut self, reason: &str) -> Self {
        self.started = ScriptedRead::Fail(reason.to_string());
        self
    }

    /// Delay every read, e.g. past the caller's query timeout.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PickSources for ScriptedSources {
    async fn signal_picks(&self, _date: NaiveDate) -> Result<Vec<Pick>> {
        self.pause().await;
        self.signal.resolve()
    }

    async fn published_picks(&self, _date: NaiveDate) -> Result<Vec<PublishedPick>> {
        self.pause().await;
        self.published.resolve()
    }

    async fn manual_picks(&self, _date: NaiveDate) -> Result<Vec<ManualPick>> {
        self.pause().await;
        self.manual.resolve()
    }

    async fn started_game_ids(&self, _date: NaiveDate) -> Result<HashSet<GameId>> {
        self.pause().await;
        self.started.resolve()
    }
}

/// Probe that always answers the same way.
pub struct FixedProbe(pub ProbeOutcome);

#[async_trait]
impl AvailabilityProbe for FixedProbe {
    async fn check(&self, _key: &str) -> Result<ProbeOutcome> {
        Ok(self.0)
    }
}
