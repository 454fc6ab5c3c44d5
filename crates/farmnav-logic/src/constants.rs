//! Game constants: round structure, sampling thresholds, leaderboard caps.
//!
//! Shared by the backend, the terminal client and the simtest harness.

/// Rounds in one game.
pub const TOTAL_ROUNDS: u32 = 5;

/// Seconds on the clock at the start of each round.
pub const ROUND_SECONDS: u32 = 12;

/// Pause between a resolved round and the next one, in milliseconds.
pub const ADVANCE_DELAY_MS: u64 = 1400;

pub mod sampling {
    /// Soil moisture below this percentage is reported as low.
    pub const LOW_MOISTURE_THRESHOLD_PCT: f64 = 45.0;
    /// Probability that the forecast is heavy rain.
    pub const HEAVY_RAIN_PROBABILITY: f64 = 0.5;
}

pub mod scores {
    /// Entries kept in a local record list.
    pub const LOCAL_CAP: usize = 50;
    /// Entries kept in the backend's score file.
    pub const PERSISTED_CAP: usize = 1000;
    /// Entries returned by the backend leaderboard endpoint.
    pub const REMOTE_LIMIT: usize = 20;
    /// Name recorded when the player gives none.
    pub const ANONYMOUS_PLAYER: &str = "Anonymous";
    /// Longest player name kept, in characters.
    pub const MAX_PLAYER_NAME_CHARS: usize = 32;
}
