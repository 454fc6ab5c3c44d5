//! HTTP paths and bodies shared by the backend and the client.
//!
//! `GET` [`NASA_DATA`] returns an [`EnvironmentSample`](crate::sample::EnvironmentSample)
//! and `GET` [`LEADERBOARD`] a list of [`ScoreEntry`]; the other bodies are
//! defined here.

use serde::{Deserialize, Serialize};

use crate::leaderboard::ScoreEntry;

pub const HEALTH: &str = "/health";
pub const NASA_FACT: &str = "/api/nasa-fact";
pub const NASA_DATA: &str = "/api/nasa-data";
pub const SAVE_SCORE: &str = "/api/save-score";
pub const LEADERBOARD: &str = "/api/leaderboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactResponse {
    pub fact: String,
}

/// Body of `POST /api/save-score`. Missing fields default to an anonymous
/// player and a score of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScoreRequest {
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScoreResponse {
    pub message: String,
    pub entry: ScoreEntry,
}
