//! Errors from talking to the backend.
//!
//! None of these reach the player: the data provider and the leaderboard
//! client log them and fall back to local sources.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned HTTP {0}")]
    BadStatus(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Network disabled by configuration.
    #[error("offline mode")]
    Offline,
}

impl ClientError {
    /// Expected failures are logged quietly; everything else at warn.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            Self::BadStatus(status.as_u16())
        } else {
            Self::NetworkUnavailable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Log an absorbed failure at the level its kind deserves.
pub(crate) fn log_fallback(what: &str, e: &ClientError) {
    if e.is_expected() {
        log::debug!("{}: {}, using local fallback", what, e);
    } else {
        log::warn!("{} failed: {}, using local fallback", what, e);
    }
}
