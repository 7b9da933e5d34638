//! Publication bookkeeping: merge summaries and the export audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What kicked off a publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    Scheduled,
    Manual,
    PostGrading,
}

impl TriggerSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerSource::Scheduled => "scheduled",
            TriggerSource::Manual => "manual",
            TriggerSource::PostGrading => "post_grading",
        }
    }
}

impl std::str::FromStr for TriggerSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TriggerSource::Scheduled),
            "manual" => Ok(TriggerSource::Manual),
            "post_grading" | "post-grading" => Ok(TriggerSource::PostGrading),
            other => Err(Error::Parse(format!("unknown trigger source '{other}'"))),
        }
    }
}

/// Counts recomputed from the final merged set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Size of the merged set.
    pub total: usize,
    /// Final attribution counts, not intermediate bookkeeping.
    pub algorithm: usize,
    pub manual: usize,
    /// Picks carried over from the locked baseline.
    pub locked: usize,
    /// Picks that entered the published set this run.
    pub new: usize,
    /// Locked picks the signal feed no longer returns.
    pub dropped: usize,
}

/// One append-only row per publish invocation. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportAuditRecord {
    /// Time-plus-random identifier, unique per invocation.
    pub export_id: String,
    pub game_date: NaiveDate,
    pub summary: MergeSummary,
    /// Compact JSON snapshot of the merged list as published.
    pub picks_snapshot: String,
    pub trigger_source: TriggerSource,
    pub created_at: DateTime<Utc>,
}

impl ExportAuditRecord {
    /// Generate an export id from the current time plus a random suffix.
    #[must_use]
    pub fn generate_id(now: DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
    }
}
