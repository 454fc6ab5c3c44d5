//! Client configuration from flags and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use farmnav_logic::constants::scores::ANONYMOUS_PLAYER;
use farmnav_logic::round::GameConfig;

use crate::session::SessionOptions;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Farm Navigator: irrigate or not, five rounds against the clock")]
pub struct ClientConfig {
    /// Backend base URL.
    #[arg(long, short = 's', env = "FARMNAV_SERVER", default_value = "http://localhost:5000")]
    pub server: String,

    #[arg(long, short = 'p', env = "FARMNAV_PLAYER", default_value = ANONYMOUS_PLAYER)]
    pub player: String,

    /// Local record list used when the backend cannot store scores.
    #[arg(long, env = "FARMNAV_SCORES_FILE", default_value = "farmnav_scores.json")]
    pub scores_file: PathBuf,

    /// Per-request limit before falling back to local data.
    #[arg(long, env = "FARMNAV_TIMEOUT_MS", default_value_t = 3000)]
    pub timeout_ms: u64,

    /// Never touch the network.
    #[arg(long)]
    pub offline: bool,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            game: GameConfig::default(),
            player: self.player.clone(),
            scores_file: Some(self.scores_file.clone()),
            request_timeout: self.timeout(),
            ..SessionOptions::default()
        }
    }
}
