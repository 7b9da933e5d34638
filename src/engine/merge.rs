//! The pick merge engine.
//!
//! Reconciles three independently-updated sources for one date (the
//! volatile signal feed, the locked published snapshot, and manual
//! overrides) into a single ranked list. Two guarantees hold across
//! every merge:
//!
//! - a pick that has been published never silently disappears, and
//! - premium tier cannot be granted or changed once the pick's game has
//!   started.
//!
//! The merge is a pure, sequential pass over already-fetched inputs. It
//! never suspends and never errors: resilience to unavailable sources is
//! handled by the caller degrading a source to empty.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{GameId, ManualPick, MergeSummary, Pick, PickSource, PublishedPick};

/// Rank used as a sort key when a pick carries none; sorts after every
/// ranked pick in its group.
const MISSING_RANK: u32 = u32::MAX;

/// Already-fetched inputs for one date's merge pass.
#[derive(Debug, Clone, Default)]
pub struct MergeInputs {
    /// Fresh algorithmic output, keyed by `player_lookup` during the merge.
    pub signal: Vec<Pick>,
    /// The locked baseline from the previous publish of this date.
    pub published: Vec<PublishedPick>,
    /// Active manual overrides.
    pub manual: Vec<ManualPick>,
    /// Games already in progress or finished.
    pub started_games: HashSet<GameId>,
}

/// One merged pick plus the bookkeeping the writer and renderer need but
/// the public projection does not carry.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPick {
    pub record: PublishedPick,
    /// Whether the signal feed still returns this player.
    pub in_signal: bool,
    /// Whether this pick entered the published set this run.
    pub newly_added: bool,
}

/// Ordered merge result plus summary counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub picks: Vec<MergedPick>,
    pub summary: MergeSummary,
}

/// Merge one date's sources into a ranked, stability-guaranteed list.
///
/// `now` is injected so reruns in tests are reproducible; it stamps
/// `updated_at`, `first_published_at` for new picks, and
/// `last_seen_in_signal` for in-signal picks.
#[must_use]
pub fn merge_day(inputs: MergeInputs, now: DateTime<Utc>) -> MergeOutcome {
    let MergeInputs {
        signal,
        published,
        manual,
        started_games,
    } = inputs;

    let signal_by_key: HashMap<String, Pick> = signal
        .into_iter()
        .map(|p| (p.player_lookup.clone(), p))
        .collect();
    let manual_by_key: HashMap<String, ManualPick> = manual
        .into_iter()
        .filter(|m| m.is_active)
        .map(|m| (m.pick.player_lookup.clone(), m))
        .collect();

    let mut merged: HashMap<String, MergedPick> = HashMap::new();

    // The locked baseline first: every published pick survives.
    for prev in published {
        let key = prev.pick.player_lookup.clone();
        let entry = match signal_by_key.get(&key) {
            Some(fresh) => {
                let mut pick = prev.pick.clone();
                // Overlay only the volatile fields; recommendation and
                // line stay locked at their published values.
                pick.edge = fresh.edge;
                pick.rank = fresh.rank;
                pick.pick_angles = fresh.pick_angles.clone();
                pick.predicted_points = fresh.predicted_points;
                pick.grading = fresh.grading.clone();
                pick.ultra_tier = gate_ultra(
                    &key,
                    &pick.game_id,
                    &started_games,
                    Some(prev.pick.ultra_tier),
                    fresh.ultra_tier,
                );
                MergedPick {
                    record: PublishedPick {
                        pick,
                        source: prev.source,
                        first_published_at: prev.first_published_at,
                        last_seen_in_signal: Some(now),
                        updated_at: now,
                    },
                    in_signal: true,
                    newly_added: false,
                }
            }
            // Dropped by the algorithm: retain everything as published,
            // including the stale last_seen_in_signal.
            None => MergedPick {
                record: PublishedPick {
                    pick: prev.pick.clone(),
                    source: prev.source,
                    first_published_at: prev.first_published_at,
                    last_seen_in_signal: prev.last_seen_in_signal,
                    updated_at: now,
                },
                in_signal: false,
                newly_added: false,
            },
        };

        merged.insert(key, entry);
    }

    // Brand-new signal picks.
    for (key, fresh) in &signal_by_key {
        if merged.contains_key(key) {
            continue;
        }
        let mut pick = fresh.clone();
        pick.ultra_tier = gate_ultra(key, &pick.game_id, &started_games, None, pick.ultra_tier);
        let source = if manual_by_key.contains_key(key) {
            PickSource::Manual
        } else {
            PickSource::Algorithm
        };
        merged.insert(
            key.clone(),
            MergedPick {
                record: PublishedPick {
                    pick,
                    source,
                    first_published_at: now,
                    last_seen_in_signal: Some(now),
                    updated_at: now,
                },
                in_signal: true,
                newly_added: true,
            },
        );
    }

    // Manual picks not yet represented, and manual overrides of
    // algorithm-sourced entries. Manual intent always wins attribution:
    // every key in the active manual map leaves this loop sourced manual.
    for (key, manual_pick) in &manual_by_key {
        match merged.get_mut(key) {
            None => {
                let mut pick = manual_pick.pick.clone();
                pick.ultra_tier =
                    gate_ultra(key, &pick.game_id, &started_games, None, pick.ultra_tier);
                merged.insert(
                    key.clone(),
                    MergedPick {
                        record: PublishedPick {
                            pick,
                            source: PickSource::Manual,
                            first_published_at: now,
                            last_seen_in_signal: None,
                            updated_at: now,
                        },
                        in_signal: false,
                        newly_added: true,
                    },
                );
            }
            Some(existing) if existing.record.source == PickSource::Manual => {
                // Already attributed manual; nothing to replace.
            }
            Some(existing) => {
                // Override: pick content from the manual entry, grading
                // from the replaced entry (the outcome doesn't change with
                // who called the pick), first_published_at preserved.
                let prior = &existing.record.pick;
                let mut pick = manual_pick.pick.clone();
                pick.grading = prior.grading.clone();
                pick.rank = manual_pick.pick.rank.or(prior.rank);
                pick.ultra_tier = gate_ultra(
                    key,
                    &pick.game_id,
                    &started_games,
                    Some(prior.ultra_tier),
                    pick.ultra_tier,
                );
                existing.record.pick = pick;
                existing.record.source = PickSource::Manual;
                existing.record.updated_at = now;
            }
        }
    }

    // Three-tier re-rank: in-signal, locked-but-dropped, manual. Within a
    // group: ascending original rank, then descending edge. The trailing
    // player_lookup comparison only breaks exact ties, keeping the output
    // independent of map iteration order.
    let mut picks: Vec<MergedPick> = merged.into_values().collect();
    picks.sort_by(|a, b| {
        sort_group(a)
            .cmp(&sort_group(b))
            .then_with(|| rank_key(a).cmp(&rank_key(b)))
            .then_with(|| b.record.pick.edge.cmp(&a.record.pick.edge))
            .then_with(|| a.record.pick.player_lookup.cmp(&b.record.pick.player_lookup))
    });
    for (index, item) in picks.iter_mut().enumerate() {
        item.record.pick.rank = Some(index as u32 + 1);
    }

    let summary = summarize(&picks);
    MergeOutcome { picks, summary }
}

/// Apply the premium gate.
///
/// Before the game starts the fresh value is adopted. Once the game is
/// underway the flag freezes at the published value, or `false` when
/// there is no published value to inherit. A blocked upgrade is logged;
/// it is not an error.
fn gate_ultra(
    player_lookup: &str,
    game_id: &GameId,
    started_games: &HashSet<GameId>,
    published: Option<bool>,
    fresh: bool,
) -> bool {
    if !started_games.contains(game_id) {
        return fresh;
    }
    let frozen = published.unwrap_or(false);
    if fresh && !frozen {
        warn!(
            player = %player_lookup,
            game_id = %game_id,
            "Game already started; premium tier stays at published value"
        );
    }
    frozen
}

fn sort_group(pick: &MergedPick) -> u8 {
    if pick.in_signal {
        0
    } else if pick.record.source == PickSource::Manual {
        2
    } else {
        1
    }
}

fn rank_key(pick: &MergedPick) -> u32 {
    pick.record.pick.rank.unwrap_or(MISSING_RANK)
}

fn summarize(picks: &[MergedPick]) -> MergeSummary {
    MergeSummary {
        total: picks.len(),
        algorithm: picks
            .iter()
            .filter(|p| p.record.source == PickSource::Algorithm)
            .count(),
        manual: picks
            .iter()
            .filter(|p| p.record.source == PickSource::Manual)
            .count(),
        locked: picks.iter().filter(|p| !p.newly_added).count(),
        new: picks.iter().filter(|p| p.newly_added).count(),
        dropped: picks.iter().filter(|p| !p.newly_added && !p.in_signal).count(),
    }
}
