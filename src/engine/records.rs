//! Win/loss aggregation over the graded pick history.
//!
//! Thin presentation math: the heavy lifting (grading itself) happens
//! upstream; this module only folds graded picks into records, streaks and
//! calendar groupings for the public artifact.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{PickResult, PublishedPick};

/// Cumulative win/loss/void tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub wins: u32,
    pub losses: u32,
    pub voids: u32,
}

impl RecordSummary {
    fn add(&mut self, result: PickResult) {
        match result {
            PickResult::Win => self.wins += 1,
            PickResult::Loss => self.losses += 1,
            PickResult::Void => self.voids += 1,
        }
    }

    /// Win percentage over decided picks. Voids don't count either way.
    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.wins + self.losses;
        if decided == 0 {
            None
        } else {
            Some(f64::from(self.wins) / f64::from(decided) * 100.0)
        }
    }
}

/// Direction of the current run of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreakKind {
    Win,
    Loss,
}

/// The current run of identical decided results, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: u32,
}

/// One date's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub record: RecordSummary,
}

/// One ISO week's record, keyed by its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRecord {
    pub week_start: NaiveDate,
    #[serde(flatten)]
    pub record: RecordSummary,
}

/// Overall record across the whole graded history.
#[must_use]
pub fn season_record(history: &[PublishedPick]) -> RecordSummary {
    let mut record = RecordSummary::default();
    for result in results(history) {
        record.add(result);
    }
    record
}

/// Per-date records, ascending by date.
#[must_use]
pub fn daily_records(history: &[PublishedPick]) -> Vec<DayRecord> {
    let mut by_day: BTreeMap<NaiveDate, RecordSummary> = BTreeMap::new();
    for pick in history {
        if let Some(result) = pick.pick.grading.result() {
            by_day.entry(pick.pick.game_date).or_default().add(result);
        }
    }
    by_day
        .into_iter()
        .map(|(date, record)| DayRecord { date, record })
        .collect()
}

/// Per-week records, ascending, keyed by the week's Monday.
#[must_use]
pub fn weekly_records(history: &[PublishedPick]) -> Vec<WeekRecord> {
    let mut by_week: BTreeMap<NaiveDate, RecordSummary> = BTreeMap::new();
    for pick in history {
        if let Some(result) = pick.pick.grading.result() {
            by_week
                .entry(week_start(pick.pick.game_date))
                .or_default()
                .add(result);
        }
    }
    by_week
        .into_iter()
        .map(|(week_start, record)| WeekRecord { week_start, record })
        .collect()
}

/// The current streak of decided results, walking back from the most
/// recent graded pick. Voids are skipped, not streak-breaking.
#[must_use]
pub fn current_streak(history: &[PublishedPick]) -> Option<Streak> {
    let mut ordered: Vec<&PublishedPick> = history
        .iter()
        .filter(|p| p.pick.grading.result().is_some())
        .collect();
    ordered.sort_by(|a, b| {
        (a.pick.game_date, a.pick.rank.unwrap_or(u32::MAX))
            .cmp(&(b.pick.game_date, b.pick.rank.unwrap_or(u32::MAX)))
    });

    let mut streak: Option<Streak> = None;
    for pick in ordered.iter().rev() {
        let kind = match pick.pick.grading.result() {
            Some(PickResult::Win) => StreakKind::Win,
            Some(PickResult::Loss) => StreakKind::Loss,
            _ => continue,
        };
        match &mut streak {
            None => streak = Some(Streak { kind, length: 1 }),
            Some(s) if s.kind == kind => s.length += 1,
            Some(_) => break,
        }
    }
    streak
}

fn results(history: &[PublishedPick]) -> impl Iterator<Item = PickResult> + '_ {
    history.iter().filter_map(|p| p.pick.grading.result())
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::picks::published_pick;

    fn graded(key: &str, date: &str, correct: Option<bool>, voided: bool) -> PublishedPick {
        let mut pick = published_pick(key, "20260805_BOS_LAL").build();
        pick.pick.game_date = date.parse().unwrap();
        pick.pick.grading.prediction_correct = correct;
        pick.pick.grading.is_voided = voided;
        pick
    }

    #[test]
    fn season_record_counts_results() {
        let history = vec![
            graded("a", "2026-08-01", Some(true), false),
            graded("b", "2026-08-01", Some(false), false),
            graded("c", "2026-08-02", Some(true), false),
            graded("d", "2026-08-02", None, true),
            graded("e", "2026-08-02", None, false), // ungraded, ignored
        ];
        let record = season_record(&history);
        assert_eq!(record.wins, 2);
        assert_eq!(record.losses, 1);
        assert_eq!(record.voids, 1);
        assert!((record.win_rate().unwrap() - 66.666).abs() < 0.01);
    }

    #[test]
    fn win_rate_ignores_voids() {
        let record = RecordSummary {
            wins: 0,
            losses: 0,
            voids: 3,
        };
        assert_eq!(record.win_rate(), None);
    }

    #[test]
    fn daily_records_group_and_sort() {
        let history = vec![
            graded("a", "2026-08-02", Some(true), false),
            graded("b", "2026-08-01", Some(false), false),
            graded("c", "2026-08-01", Some(true), false),
        ];
        let daily = daily_records(&history);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, "2026-08-01".parse().unwrap());
        assert_eq!(daily[0].record.wins, 1);
        assert_eq!(daily[0].record.losses, 1);
        assert_eq!(daily[1].record.wins, 1);
    }

    #[test]
    fn weekly_records_key_on_monday() {
        // 2026-08-05 is a Wednesday; its week starts 2026-08-03.
        let history = vec![graded("a", "2026-08-05", Some(true), false)];
        let weekly = weekly_records(&history);
        assert_eq!(weekly[0].week_start, "2026-08-03".parse().unwrap());
    }

    #[test]
    fn streak_walks_back_and_skips_voids() {
        let history = vec![
            graded("a", "2026-08-01", Some(false), false),
            graded("b", "2026-08-02", Some(true), false),
            graded("c", "2026-08-03", None, true), // void, skipped
            graded("d", "2026-08-04", Some(true), false),
        ];
        let streak = current_streak(&history).unwrap();
        assert_eq!(streak.kind, StreakKind::Win);
        assert_eq!(streak.length, 2);
    }

    #[test]
    fn no_streak_without_decided_picks() {
        let history = vec![graded("a", "2026-08-01", None, true)];
        assert_eq!(current_streak(&history), None);
    }
}
