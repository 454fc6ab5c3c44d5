//! Client against a live backend on an ephemeral local port.

use std::sync::Arc;
use std::time::Duration;

use farmnav_client::leaderboard::{LeaderboardClient, Submission};
use farmnav_client::{ApiClient, Backend, GameSession, SessionCommand, SessionOptions};
use farmnav_logic::decision::correct_action;
use farmnav_logic::facts::NASA_FACTS;
use farmnav_logic::persistence::ScoreStore;
use farmnav_logic::presentation::{PresentationEvent, RecordingPresenter};
use farmnav_logic::round::{GameConfig, GamePhase};
use farmnav_server::{create_router, AppState};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

const TIMEOUT: Duration = Duration::from_secs(3);

async fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(ScoreStore::in_memory(), None));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A URL where nothing is listening.
async fn dead_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn samples_and_facts_come_from_the_backend() {
    let api = ApiClient::new(&spawn_server().await, TIMEOUT).unwrap();
    for _ in 0..10 {
        let sample = api.fetch_sample().await.unwrap();
        assert!(sample.is_well_formed());
    }
    let fact = api.fetch_fact().await.unwrap();
    assert!(NASA_FACTS.contains(&fact.as_str()));
}

#[tokio::test]
async fn scores_round_trip_through_the_backend() {
    let api = Arc::new(ApiClient::new(&spawn_server().await, TIMEOUT).unwrap());
    let mut client = LeaderboardClient::new(Arc::clone(&api), None, TIMEOUT);

    for (player, score) in [("Ada", 3), ("Grace", 5), ("", 1)] {
        assert!(matches!(
            client.submit(player, score).await,
            Submission::Remote(_)
        ));
    }

    let top = client.fetch_top(2).await;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].player_name, "Grace");
    assert_eq!(top[1].player_name, "Ada");
    let all = api.leaderboard().await.unwrap();
    assert!(all.iter().any(|e| e.player_name == "Anonymous" && e.score == 1));
    assert!(client.local().board().is_empty());
}

#[tokio::test]
async fn full_game_against_live_backend() {
    let api = Arc::new(ApiClient::new(&spawn_server().await, TIMEOUT).unwrap());
    let options = SessionOptions {
        player: "Ada".to_string(),
        ..SessionOptions::default()
    };
    let mut session = GameSession::new(Arc::clone(&api), RecordingPresenter::new(), options);

    session.start_round().await.unwrap();
    while session.engine().phase() != GamePhase::GameOver {
        let sample = session.engine().state().current_sample.unwrap();
        assert!(session.act(correct_action(&sample)).await.unwrap());
        if session.engine().phase() == GamePhase::RoundResolved {
            session.start_round().await.unwrap();
        }
    }

    assert_eq!(session.engine().state().score, 5);
    let board = api.leaderboard().await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].player_name, "Ada");
    assert_eq!(board[0].score, 5);
    assert!(matches!(
        session.presenter().events.last(),
        Some(PresentationEvent::Leaderboard(entries)) if entries.len() == 1
    ));
}

#[tokio::test]
async fn real_time_loop_with_short_rounds() {
    let api = Arc::new(ApiClient::new(&spawn_server().await, TIMEOUT).unwrap());
    let options = SessionOptions {
        game: GameConfig {
            total_rounds: 2,
            round_seconds: 2,
            advance_delay: Duration::from_millis(20),
        },
        tick: Duration::from_millis(10),
        player: "Idle".to_string(),
        ..SessionOptions::default()
    };
    let (tx, rx) = mpsc::channel(4);
    let mut session = GameSession::new(Arc::clone(&api), RecordingPresenter::new(), options);
    let handle = tokio::spawn(async move {
        let result = session.run(rx).await;
        (session, result)
    });

    // nobody answers; both rounds time out and the score is posted
    let mut posted = false;
    for _ in 0..250 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if !api.leaderboard().await.unwrap().is_empty() {
            posted = true;
            break;
        }
    }
    assert!(posted, "score never reached the backend");

    tx.send(SessionCommand::Quit).await.unwrap();
    let (session, result) = handle.await.unwrap();
    assert_eq!(result, Ok(0));
    assert_eq!(session.presenter().count(|e| *e == PresentationEvent::TimedOut), 2);
}

#[tokio::test]
async fn unreachable_backend_falls_back_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(ApiClient::new(&dead_server().await, TIMEOUT).unwrap());
    let options = SessionOptions {
        game: GameConfig {
            total_rounds: 2,
            ..GameConfig::default()
        },
        player: "Grace".to_string(),
        scores_file: Some(dir.path().join("farmnav_scores.json")),
        ..SessionOptions::default()
    };
    let mut session = GameSession::new(api, RecordingPresenter::new(), options);

    let fact = session.fact().await;
    assert!(NASA_FACTS.contains(&fact.as_str()));

    session.start_round().await.unwrap();
    while session.engine().phase() != GamePhase::GameOver {
        let sample = session.engine().state().current_sample.unwrap();
        assert!(sample.is_well_formed());
        session.act(correct_action(&sample)).await.unwrap();
        if session.engine().phase() == GamePhase::RoundResolved {
            session.start_round().await.unwrap();
        }
    }

    let top = session.scores().fetch_top(10).await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player_name, "Grace");
    assert_eq!(top[0].score, 2);
    assert!(dir.path().join("farmnav_scores.json").exists());
}
