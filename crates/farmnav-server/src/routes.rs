//! HTTP routes and handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use farmnav_logic::api::{self, FactResponse, SaveScoreRequest, SaveScoreResponse};
use farmnav_logic::constants::scores::{ANONYMOUS_PLAYER, REMOTE_LIMIT};
use farmnav_logic::facts;
use farmnav_logic::leaderboard::ScoreEntry;
use farmnav_logic::persistence::ScoreStore;
use farmnav_logic::sample::EnvironmentSample;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub scores: Arc<Mutex<ScoreStore>>,
    /// Front-end directory; `None` serves the API only.
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(scores: ScoreStore, static_dir: Option<PathBuf>) -> Self {
        Self {
            scores: Arc::new(Mutex::new(scores)),
            static_dir,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route(api::HEALTH, get(health_check))
        .route(api::NASA_FACT, get(nasa_fact))
        .route(api::NASA_DATA, get(nasa_data))
        .route(api::SAVE_SCORE, post(save_score))
        .route(api::LEADERBOARD, get(leaderboard));

    // Anything else falls through to the single-page front-end
    if let Some(dir) = &state.static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(spa);
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn nasa_fact() -> Json<FactResponse> {
    let fact = facts::random_fact(&mut rand::thread_rng());
    Json(FactResponse {
        fact: fact.to_string(),
    })
}

/// Simulated satellite reading, drawn the same way the client's fallback is.
async fn nasa_data() -> Json<EnvironmentSample> {
    Json(EnvironmentSample::random(&mut rand::thread_rng()))
}

async fn save_score(
    State(state): State<AppState>,
    Json(req): Json<SaveScoreRequest>,
) -> Json<SaveScoreResponse> {
    let player = req.player.as_deref().unwrap_or(ANONYMOUS_PLAYER);
    let entry = ScoreEntry::now(player, req.score.unwrap_or(0));
    log::info!("Score saved: {} = {}", entry.player_name, entry.score);

    // The file write blocks, so it runs off the async workers with the lock held
    let mut store = Arc::clone(&state.scores).lock_owned().await;
    let saved = entry.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || store.save(saved)).await {
        log::warn!("Score store task failed: {}", e);
    }

    Json(SaveScoreResponse {
        message: "Score saved".to_string(),
        entry,
    })
}

async fn leaderboard(State(state): State<AppState>) -> Json<Vec<ScoreEntry>> {
    Json(state.scores.lock().await.top(REMOTE_LIMIT))
}
