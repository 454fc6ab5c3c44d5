// API tests: every endpoint through the router, no network socket.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use farmnav_logic::api::{FactResponse, SaveScoreResponse};
use farmnav_logic::facts::NASA_FACTS;
use farmnav_logic::constants::scores::PERSISTED_CAP;
use farmnav_logic::leaderboard::ScoreEntry;
use farmnav_logic::persistence::ScoreStore;
use farmnav_logic::sample::{EnvironmentSample, SoilMoisture};
use farmnav_server::{create_router, AppState};
use serde_json::Value;
use tower::ServiceExt; // for oneshot

fn test_app() -> Router {
    create_router(AppState::new(ScoreStore::in_memory(), None))
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// =========================================================================
// Health, facts, data
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_nasa_fact_from_catalogue() {
    let app = test_app();
    let response = get(&app, "/api/nasa-fact").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: FactResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(NASA_FACTS.contains(&body.fact.as_str()));
}

#[tokio::test]
async fn test_nasa_data_is_valid_sample() {
    let app = test_app();
    for _ in 0..20 {
        let response = get(&app, "/api/nasa-data").await;
        assert_eq!(response.status(), StatusCode::OK);

        let raw: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(raw["soil_moisture"] == "low" || raw["soil_moisture"] == "high");
        assert!(raw["rainfall_forecast"] == "none" || raw["rainfall_forecast"] == "heavy");

        let sample: EnvironmentSample = serde_json::from_value(raw).unwrap();
        assert!(sample.is_well_formed());
        if sample.soil_moisture_level == SoilMoisture::Low {
            assert!(sample.soil_moisture_pct <= 45);
        }
    }
}

// =========================================================================
// Scores
// =========================================================================

#[tokio::test]
async fn test_save_score_echoes_entry() {
    let app = test_app();
    let response = post_json(
        &app,
        "/api/save-score",
        serde_json::json!({ "player": "Ada", "score": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: SaveScoreResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.message, "Score saved");
    assert_eq!(body.entry.player_name, "Ada");
    assert_eq!(body.entry.score, 4);
}

#[tokio::test]
async fn test_save_score_defaults() {
    let app = test_app();
    let response = post_json(&app, "/api/save-score", serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: SaveScoreResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.entry.player_name, "Anonymous");
    assert_eq!(body.entry.score, 0);
}

#[tokio::test]
async fn test_save_score_rejects_bad_body() {
    let app = test_app();
    let response = post_json(
        &app,
        "/api/save-score",
        serde_json::json!({ "player": "Ada", "score": -3 }),
    )
    .await;
    assert!(response.status().is_client_error());

    let board = get(&app, "/api/leaderboard").await;
    let entries: Vec<ScoreEntry> = serde_json::from_slice(&body_bytes(board).await).unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_leaderboard_sorted_and_limited() {
    let app = test_app();
    for i in 0..30u32 {
        let response = post_json(
            &app,
            "/api/save-score",
            serde_json::json!({ "player": format!("p{}", i), "score": (i * 7) % 6 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(&app, "/api/leaderboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries: Vec<ScoreEntry> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(entries.len(), 20);
    assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(entries[0].score, 5);
}

#[tokio::test]
async fn test_leaderboard_persisted_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    {
        let app = create_router(AppState::new(ScoreStore::open(Some(&path), PERSISTED_CAP), None));
        let response = post_json(
            &app,
            "/api/save-score",
            serde_json::json!({ "player": "Grace", "score": 5 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = create_router(AppState::new(ScoreStore::open(Some(&path), PERSISTED_CAP), None));
    let response = get(&app, "/api/leaderboard").await;
    let entries: Vec<ScoreEntry> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].player_name, "Grace");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_saves_all_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    let app = create_router(AppState::new(ScoreStore::open(Some(&path), PERSISTED_CAP), None));

    let posts: Vec<_> = (0..16u32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = serde_json::json!({ "player": format!("p{i}"), "score": i });
                post_json(&app, "/api/save-score", body).await.status()
            })
        })
        .collect();
    for post in posts {
        assert_eq!(post.await.unwrap(), StatusCode::OK);
    }

    // Reads still answer while the store is idle again
    let response = get(&app, "/api/leaderboard").await;
    assert_eq!(response.status(), StatusCode::OK);

    let reopened = ScoreStore::open(Some(&path), PERSISTED_CAP);
    assert!(reopened.is_persistent());
    assert_eq!(reopened.board().len(), 16);
    assert_eq!(reopened.top(1)[0].score, 15);
}

// =========================================================================
// Front-end
// =========================================================================

#[tokio::test]
async fn test_spa_fallback_serves_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Farm Navigator</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
    let app = create_router(AppState::new(
        ScoreStore::in_memory(),
        Some(dir.path().to_path_buf()),
    ));

    let response = get(&app, "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"console.log(1);");

    let response = get(&app, "/some/client/route").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"<h1>Farm Navigator</h1>");

    // API routes are not shadowed
    let response = get(&app, "/api/nasa-fact").await;
    let body: FactResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(!body.fact.is_empty());
}

#[tokio::test]
async fn test_unknown_path_without_front_end() {
    let app = test_app();
    let response = get(&app, "/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
