//! Farm Navigator backend entry point.
//!
//! Usage:
//!   cargo run -p farmnav-server
//!   PORT=8080 LEADERBOARD_DB=scores.json cargo run -p farmnav-server

use std::net::SocketAddr;

use clap::Parser;
use farmnav_logic::constants::scores::PERSISTED_CAP;
use farmnav_logic::persistence::ScoreStore;
use farmnav_server::config::ServerConfig;
use farmnav_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    log::info!("Configuration: {:?}", config);

    let scores = ScoreStore::open(config.leaderboard_db.as_deref(), PERSISTED_CAP);

    let static_dir = if config.static_dir.is_dir() {
        Some(config.static_dir.clone())
    } else {
        log::info!(
            "Static directory {} not found, serving the API only",
            config.static_dir.display()
        );
        None
    };

    let app = create_router(AppState::new(scores, static_dir));

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
