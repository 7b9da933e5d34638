//! Publish pipeline: read, merge, persist, render.
//!
//! A publish run must always produce the public artifact when the merge
//! itself succeeds. Source reads degrade to empty, snapshot and audit
//! writes are best-effort; staleness is preferable to an outage.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{error, info, warn};

use super::merge::{self, MergeInputs};
use super::render;
use crate::breaker::{PipelineBreaker, ServiceBreaker};
use crate::domain::{ExportAuditRecord, MergeSummary, PublishedPick, TriggerSource};
use crate::error::{Error, Result};
use crate::port::notifier::{Event, NotifierRegistry};
use crate::port::source::PickSources;
use crate::port::store::{AuditStore, SnapshotStore};
use crate::port::ArtifactStore;

/// Circuit key guarding artifact writes.
const ARTIFACT_CIRCUIT: &str = "artifact_store";

/// What a publish run accomplished.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub date: NaiveDate,
    pub summary: MergeSummary,
    pub snapshot_written: bool,
    pub audit_written: bool,
    pub artifact_written: bool,
    pub artifact_name: String,
}

/// Orchestrates one date's publish run.
pub struct Publisher<S, A> {
    sources: Arc<dyn PickSources>,
    snapshots: S,
    audits: A,
    artifacts: Arc<dyn ArtifactStore>,
    notifiers: Arc<NotifierRegistry>,
    reads: PipelineBreaker,
    writes: ServiceBreaker,
    query_timeout: Duration,
}

impl<S, A> Publisher<S, A>
where
    S: SnapshotStore,
    A: AuditStore,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sources: Arc<dyn PickSources>,
        snapshots: S,
        audits: A,
        artifacts: Arc<dyn ArtifactStore>,
        notifiers: Arc<NotifierRegistry>,
        reads: PipelineBreaker,
        writes: ServiceBreaker,
        query_timeout: Duration,
    ) -> Self {
        Self {
            sources,
            snapshots,
            audits,
            artifacts,
            notifiers,
            reads,
            writes,
            query_timeout,
        }
    }

    /// Run the full pipeline for `date`.
    pub async fn publish_day(
        &self,
        date: NaiveDate,
        trigger: TriggerSource,
    ) -> Result<PublishReport> {
        let (signal, published, manual, started_games) = tokio::join!(
            self.read_source("signal", date, self.sources.signal_picks(date)),
            self.read_source("published", date, self.sources.published_picks(date)),
            self.read_source("manual", date, self.sources.manual_picks(date)),
            self.read_source("game_status", date, self.sources.started_game_ids(date)),
        );

        let now = Utc::now();
        let outcome = merge::merge_day(
            MergeInputs {
                signal,
                published,
                manual,
                started_games,
            },
            now,
        );
        let rows: Vec<PublishedPick> = outcome.picks.iter().map(|p| p.record.clone()).collect();

        let snapshot_written = match self.snapshots.replace_day(date, &rows).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    %date,
                    error = %e,
                    "Locked snapshot write failed; continuing with in-memory merge"
                );
                false
            }
        };

        let audit_written = self.append_audit(date, trigger, &outcome, now).await;

        // Aggregation reads the freshly-written history when available,
        // and degrades to the merge output alone when it is not.
        let history = match self.snapshots.graded_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Graded history unavailable; records will be empty");
                Vec::new()
            }
        };

        let artifact = render::day_artifact(date, &outcome, &history, now);
        let artifact_name = render::artifact_name(date);
        let body = serde_json::to_value(&artifact)?;
        let artifact_written = match self
            .writes
            .call(ARTIFACT_CIRCUIT, || {
                self.artifacts.publish_json(&artifact_name, &body)
            })
            .await
        {
            Ok(()) => true,
            Err(e) if e.is_circuit_open() => {
                warn!(%date, error = %e, "Artifact store circuit open; artifact not published");
                false
            }
            Err(e) => {
                error!(%date, error = %e, "Artifact write failed");
                false
            }
        };

        self.notifiers.notify_all(Event::PicksPublished {
            date,
            summary: outcome.summary,
        });
        info!(
            %date,
            trigger = trigger.as_str(),
            total = outcome.summary.total,
            new = outcome.summary.new,
            dropped = outcome.summary.dropped,
            snapshot_written,
            audit_written,
            artifact_written,
            "Publish run complete"
        );

        Ok(PublishReport {
            date,
            summary: outcome.summary,
            snapshot_written,
            audit_written,
            artifact_written,
            artifact_name,
        })
    }

    /// Read one source through its circuit, degrading to empty on open
    /// circuits, failures and timeouts. A missing source never aborts the
    /// merge; that is the point of locking.
    async fn read_source<T, Fut>(&self, name: &str, date: NaiveDate, read: Fut) -> T
    where
        T: Default,
        Fut: Future<Output = Result<T>>,
    {
        let key = format!("warehouse:{name}:{date}");
        if !self.reads.is_available(&key).await {
            warn!(source = name, %date, "Circuit open; treating source as empty");
            return T::default();
        }

        match timeout(self.query_timeout, read).await {
            Ok(Ok(rows)) => {
                self.reads.record_success(&key);
                rows
            }
            Ok(Err(e)) => {
                self.reads.record_failure(&key, &e.to_string());
                warn!(source = name, %date, error = %e, "Source read failed; treating as empty");
                T::default()
            }
            Err(_) => {
                let e = Error::Timeout {
                    source_name: name.to_string(),
                    timeout: self.query_timeout,
                };
                self.reads.record_failure(&key, &e.to_string());
                warn!(source = name, %date, error = %e, "Source read timed out; treating as empty");
                T::default()
            }
        }
    }

    async fn append_audit(
        &self,
        date: NaiveDate,
        trigger: TriggerSource,
        outcome: &merge::MergeOutcome,
        now: chrono::DateTime<Utc>,
    ) -> bool {
        let payloads: Vec<render::PickPayload> = outcome
            .picks
            .iter()
            .map(|p| render::pick_payload(&p.record))
            .collect();
        let picks_snapshot = match serde_json::to_string(&payloads) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize audit snapshot");
                return false;
            }
        };

        let record = ExportAuditRecord {
            export_id: ExportAuditRecord::generate_id(now),
            game_date: date,
            summary: outcome.summary,
            picks_snapshot,
            trigger_source: trigger,
            created_at: now,
        };

        match self.audits.append(&record).await {
            Ok(()) => true,
            Err(e) => {
                error!(%date, error = %e, "Audit append failed");
                false
            }
        }
    }
}
