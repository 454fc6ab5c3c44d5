//! Leaderboard entries and ordering.
//!
//! A [`Leaderboard`] is an in-memory record list kept sorted by descending
//! score, ties in insertion order, and capped after every insert. Both the
//! backend store and the client's local fallback use it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::scores::{ANONYMOUS_PLAYER, MAX_PLAYER_NAME_CHARS};

/// One finished game. Immutable once created.
///
/// Field names match the `/api/leaderboard` wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "player")]
    pub player_name: String,
    pub score: u32,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn new(player_name: &str, score: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            player_name: normalize_player_name(player_name),
            score,
            timestamp,
        }
    }

    /// Entry stamped with the current time.
    pub fn now(player_name: &str, score: u32) -> Self {
        Self::new(player_name, score, Utc::now())
    }
}

/// Trimmed, length-limited name; blank names become `Anonymous`.
pub fn normalize_player_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ANONYMOUS_PLAYER.to_string();
    }
    trimmed.chars().take(MAX_PLAYER_NAME_CHARS).collect()
}

/// Stable sort by descending score.
pub fn sort_descending(entries: &mut [ScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
    cap: usize,
}

impl Leaderboard {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Build from entries in any order. Earlier entries win ties.
    pub fn from_entries(mut entries: Vec<ScoreEntry>, cap: usize) -> Self {
        sort_descending(&mut entries);
        entries.truncate(cap);
        Self { entries, cap }
    }

    /// Add an entry, re-sort and drop whatever falls beyond the cap.
    ///
    /// Returns whether the new entry survived the cut.
    pub fn insert(&mut self, entry: ScoreEntry) -> bool {
        self.entries.push(entry);
        let inserted = self.entries.len() - 1;
        // sort_by is stable, so the new entry stays behind equal scores
        let rank = self.entries[..inserted]
            .iter()
            .take_while(|e| e.score >= self.entries[inserted].score)
            .count();
        sort_descending(&mut self.entries);
        self.entries.truncate(self.cap);
        rank < self.cap
    }

    /// Up to `n` best entries.
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, score: u32, second: u32) -> ScoreEntry {
        ScoreEntry::new(
            name,
            score,
            Utc.with_ymd_and_hms(2025, 10, 4, 12, 0, second).unwrap(),
        )
    }

    fn is_non_increasing(entries: &[ScoreEntry]) -> bool {
        entries.windows(2).all(|w| w[0].score >= w[1].score)
    }

    #[test]
    fn test_player_name_normalized() {
        assert_eq!(normalize_player_name("  Ada "), "Ada");
        assert_eq!(normalize_player_name(""), "Anonymous");
        assert_eq!(normalize_player_name("   "), "Anonymous");
        let long = "x".repeat(80);
        assert_eq!(normalize_player_name(&long).chars().count(), 32);
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut board = Leaderboard::new(50);
        for (i, score) in [2, 5, 0, 3, 5, 1].into_iter().enumerate() {
            board.insert(entry("p", score, i as u32));
        }
        assert!(is_non_increasing(board.entries()));
        assert_eq!(board.entries()[0].score, 5);
        assert_eq!(board.entries().last().unwrap().score, 0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new(50);
        board.insert(entry("first", 3, 0));
        board.insert(entry("second", 3, 1));
        board.insert(entry("third", 4, 2));
        let names: Vec<_> = board.entries().iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_cap_discards_lowest() {
        let mut board = Leaderboard::new(3);
        assert!(board.insert(entry("a", 1, 0)));
        assert!(board.insert(entry("b", 4, 1)));
        assert!(board.insert(entry("c", 2, 2)));
        assert!(board.insert(entry("d", 5, 3)));
        assert_eq!(board.len(), 3);
        let scores: Vec<_> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![5, 4, 2]);

        // equal to the current floor, but later: falls off
        assert!(!board.insert(entry("e", 2, 4)));
        assert!(board.entries().iter().all(|e| e.player_name != "e"));
    }

    #[test]
    fn test_top_limits_length() {
        let mut board = Leaderboard::new(50);
        for i in 0..10 {
            board.insert(entry("p", i, i));
        }
        assert_eq!(board.top(3).len(), 3);
        assert_eq!(board.top(3)[0].score, 9);
        assert_eq!(board.top(100).len(), 10);
        assert!(board.top(0).is_empty());
    }

    #[test]
    fn test_from_entries_sorts_and_caps() {
        let entries = (0..60).map(|i| entry("p", i % 7, 0)).collect();
        let board = Leaderboard::from_entries(entries, 50);
        assert_eq!(board.len(), 50);
        assert!(is_non_increasing(board.entries()));
    }

    #[test]
    fn test_wire_format() {
        let e = entry("Ada", 4, 9);
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["player"], "Ada");
        assert_eq!(v["score"], 4);
        assert_eq!(v["date"], "2025-10-04T12:00:09Z");
        let back: ScoreEntry = serde_json::from_value(v).unwrap();
        assert_eq!(back, e);
    }
}
