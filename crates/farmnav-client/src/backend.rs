//! Remote data sources.
//!
//! [`Backend`] is the seam between the game and the network. [`ApiClient`]
//! talks to the Farm Navigator HTTP backend; [`OfflineBackend`] fails every
//! call so the local fallbacks take over. Tests substitute their own.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use farmnav_logic::api::{self, FactResponse, SaveScoreRequest, SaveScoreResponse};
use farmnav_logic::leaderboard::ScoreEntry;
use farmnav_logic::sample::EnvironmentSample;

use crate::error::ClientError;

pub trait Backend: Send + Sync {
    fn fetch_sample(&self) -> impl Future<Output = Result<EnvironmentSample, ClientError>> + Send;

    fn fetch_fact(&self) -> impl Future<Output = Result<String, ClientError>> + Send;

    /// Store a finished game; returns the entry as the backend recorded it.
    fn save_score(
        &self,
        player: &str,
        score: u32,
    ) -> impl Future<Output = Result<ScoreEntry, ClientError>> + Send;

    fn leaderboard(&self) -> impl Future<Output = Result<Vec<ScoreEntry>, ClientError>> + Send;
}

/// Run `fut`, turning an elapsed `limit` into [`ClientError::Timeout`].
pub async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or(Err(ClientError::Timeout))
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::BadStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::read_json(response).await
    }
}

impl Backend for ApiClient {
    async fn fetch_sample(&self) -> Result<EnvironmentSample, ClientError> {
        self.get_json(api::NASA_DATA).await
    }

    async fn fetch_fact(&self) -> Result<String, ClientError> {
        let body: FactResponse = self.get_json(api::NASA_FACT).await?;
        Ok(body.fact)
    }

    async fn save_score(&self, player: &str, score: u32) -> Result<ScoreEntry, ClientError> {
        let request = SaveScoreRequest {
            player: Some(player.to_string()),
            score: Some(score),
        };
        let response = self
            .http
            .post(self.url(api::SAVE_SCORE))
            .json(&request)
            .send()
            .await?;
        let body: SaveScoreResponse = Self::read_json(response).await?;
        Ok(body.entry)
    }

    async fn leaderboard(&self) -> Result<Vec<ScoreEntry>, ClientError> {
        self.get_json(api::LEADERBOARD).await
    }
}

// ============================================================================
// Offline
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl Backend for OfflineBackend {
    async fn fetch_sample(&self) -> Result<EnvironmentSample, ClientError> {
        Err(ClientError::Offline)
    }

    async fn fetch_fact(&self) -> Result<String, ClientError> {
        Err(ClientError::Offline)
    }

    async fn save_score(&self, _player: &str, _score: u32) -> Result<ScoreEntry, ClientError> {
        Err(ClientError::Offline)
    }

    async fn leaderboard(&self) -> Result<Vec<ScoreEntry>, ClientError> {
        Err(ClientError::Offline)
    }
}
