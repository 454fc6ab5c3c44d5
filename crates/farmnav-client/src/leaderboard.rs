//! Score submission and retrieval, remote first with a local record list.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use farmnav_logic::constants::scores::LOCAL_CAP;
use farmnav_logic::leaderboard::{sort_descending, ScoreEntry};
use farmnav_logic::persistence::ScoreStore;

use crate::backend::{bounded, Backend};
use crate::error::log_fallback;

/// Where a submitted score ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Remote(ScoreEntry),
    Local(ScoreEntry),
}

impl Submission {
    pub fn entry(&self) -> &ScoreEntry {
        match self {
            Self::Remote(entry) | Self::Local(entry) => entry,
        }
    }
}

pub struct LeaderboardClient<B> {
    backend: Arc<B>,
    local: ScoreStore,
    timeout: Duration,
}

impl<B: Backend> LeaderboardClient<B> {
    /// `local_path` names the local record list; `None` keeps it in memory.
    /// An unreadable list is moved aside and started over on disk.
    pub fn new(backend: Arc<B>, local_path: Option<&Path>, timeout: Duration) -> Self {
        Self {
            backend,
            local: ScoreStore::open_or_reset(local_path, LOCAL_CAP),
            timeout,
        }
    }

    /// Best effort. A failed remote save goes to the local record list.
    pub async fn submit(&mut self, player: &str, score: u32) -> Submission {
        match bounded(self.timeout, self.backend.save_score(player, score)).await {
            Ok(entry) => {
                log::info!(
                    "Score {} for {} saved remotely",
                    entry.score,
                    entry.player_name
                );
                Submission::Remote(entry)
            }
            Err(e) => {
                log_fallback("Score submit", &e);
                let entry = ScoreEntry::now(player, score);
                self.local.save(entry.clone());
                Submission::Local(entry)
            }
        }
    }

    /// At most `n` entries, highest score first.
    pub async fn fetch_top(&self, n: usize) -> Vec<ScoreEntry> {
        match bounded(self.timeout, self.backend.leaderboard()).await {
            Ok(mut entries) => {
                sort_descending(&mut entries);
                entries.truncate(n);
                entries
            }
            Err(e) => {
                log_fallback("Leaderboard fetch", &e);
                self.local.top(n)
            }
        }
    }

    pub fn local(&self) -> &ScoreStore {
        &self.local
    }
}
