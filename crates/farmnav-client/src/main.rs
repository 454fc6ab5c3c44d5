//! Farm Navigator terminal client.
//!
//! Usage:
//!   cargo run -p farmnav-client -- --player Ada
//!   FARMNAV_SERVER=http://farm.example:5000 cargo run -p farmnav-client
//!   cargo run -p farmnav-client -- --offline

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use farmnav_client::config::ClientConfig;
use farmnav_client::terminal::{self, TerminalPresenter};
use farmnav_client::{ApiClient, Backend, GameSession, OfflineBackend, SessionOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ClientConfig::parse();
    log::info!("Configuration: {:?}", config);
    let options = config.session_options();

    let score = if config.offline {
        play(Arc::new(OfflineBackend), options).await?
    } else {
        let api = ApiClient::new(&config.server, config.timeout())?;
        play(Arc::new(api), options).await?
    };

    log::info!("Session ended with score {}", score);
    Ok(())
}

async fn play<B: Backend + 'static>(
    backend: Arc<B>,
    options: SessionOptions,
) -> anyhow::Result<u32> {
    let player = options.player.clone();
    let presenter = TerminalPresenter::stdout(options.game.total_rounds);
    let mut session = GameSession::new(backend, presenter, options);

    let fact = session.fact().await;
    session.presenter_mut().intro(&player, &fact);

    let (tx, rx) = mpsc::channel(16);
    terminal::spawn_stdin_reader(tx);

    Ok(session.run(rx).await?)
}
