//! Game identifier parsing.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Composite game key in the form `YYYYMMDD_AWAY_HOME`.
///
/// The id is treated as opaque for keying and equality; parsing it into
/// parts is a display nicety and fails soft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

/// Parsed components of a [`GameId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameIdParts<'a> {
    pub date: NaiveDate,
    pub away: &'a str,
    pub home: &'a str,
}

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the id into date, away and home components.
    ///
    /// Returns `None` for anything that does not match the expected shape
    /// rather than erroring; malformed ids from upstream feeds happen.
    #[must_use]
    pub fn parts(&self) -> Option<GameIdParts<'_>> {
        let mut segments = self.0.splitn(3, '_');
        let date_str = segments.next()?;
        let away = segments.next()?;
        let home = segments.next()?;

        if away.is_empty() || home.is_empty() || home.contains('_') {
            return None;
        }

        let date = NaiveDate::parse_from_str(date_str, "%Y%m%d").ok()?;
        Some(GameIdParts { date, away, home })
    }

    /// Whether `team_abbr` is the home side of this game.
    ///
    /// Fails soft: a malformed id yields `false`.
    #[must_use]
    pub fn is_home(&self, team_abbr: &str) -> bool {
        self.parts().is_some_and(|p| p.home == team_abbr)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for GameId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_id() {
        let id = GameId::new("20260805_BOS_LAL");
        let parts = id.parts().unwrap();
        assert_eq!(parts.date, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
        assert_eq!(parts.away, "BOS");
        assert_eq!(parts.home, "LAL");
    }

    #[test]
    fn home_derivation_is_fail_soft() {
        assert!(GameId::new("20260805_BOS_LAL").is_home("LAL"));
        assert!(!GameId::new("20260805_BOS_LAL").is_home("BOS"));
        assert!(!GameId::new("garbage").is_home("LAL"));
        assert!(!GameId::new("2026-08-05_BOS_LAL").is_home("LAL"));
        assert!(!GameId::new("").is_home("LAL"));
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(GameId::new("20260805_BOS").parts().is_none());
        assert!(GameId::new("20260805__LAL").parts().is_none());
        assert!(GameId::new("20260805_BOS_").parts().is_none());
    }

    #[test]
    fn extra_underscore_in_home_rejected() {
        // Three-way split would silently fold extra segments into home.
        assert!(GameId::new("20260805_BOS_LAL_X").parts().is_none());
    }
}
