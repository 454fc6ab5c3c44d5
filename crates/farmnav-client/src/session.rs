//! One game session: the round engine driven in real time.
//!
//! The session loop waits on three sources at once: player commands, the
//! one-second round ticker, and the pending start of the next round. Each
//! round begins by fetching a sample, so the engine never waits on the
//! network mid-round. When the engine reports game over the score is
//! submitted once and the leaderboard is shown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use farmnav_logic::constants::scores::{ANONYMOUS_PLAYER, REMOTE_LIMIT};
use farmnav_logic::decision::Action;
use farmnav_logic::presentation::PresentationAdapter;
use farmnav_logic::round::{Advance, GameConfig, GamePhase, RoundEngine, RoundError, TickResult};

use crate::backend::Backend;
use crate::data_provider::DataProvider;
use crate::leaderboard::LeaderboardClient;

/// Input from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Act(Action),
    Restart,
    Quit,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub game: GameConfig,
    /// Length of one clock unit.
    pub tick: Duration,
    pub player: String,
    /// Local record list; `None` keeps fallback scores in memory.
    pub scores_file: Option<PathBuf>,
    pub request_timeout: Duration,
    /// Seed for locally generated samples and facts.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick: Duration::from_secs(1),
            player: ANONYMOUS_PLAYER.to_string(),
            scores_file: None,
            request_timeout: Duration::from_secs(3),
            seed: None,
        }
    }
}

pub struct GameSession<B, P> {
    engine: RoundEngine,
    data: DataProvider<B>,
    scores: LeaderboardClient<B>,
    presenter: P,
    player: String,
    tick: Duration,
    /// When the next round starts, while waiting out the advance delay.
    next_round_at: Option<Instant>,
}

impl<B: Backend, P: PresentationAdapter + Send> GameSession<B, P> {
    pub fn new(backend: Arc<B>, presenter: P, options: SessionOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            engine: RoundEngine::new(options.game),
            data: DataProvider::new(Arc::clone(&backend), rng, options.request_timeout),
            scores: LeaderboardClient::new(
                backend,
                options.scores_file.as_deref(),
                options.request_timeout,
            ),
            presenter,
            player: options.player,
            tick: options.tick,
            next_round_at: None,
        }
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn scores(&self) -> &LeaderboardClient<B> {
        &self.scores
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// A fact for the intro screen.
    pub async fn fact(&mut self) -> String {
        self.data.fetch_fact().await
    }

    /// Fetch a sample and start the next round with it.
    pub async fn start_round(&mut self) -> Result<(), RoundError> {
        let sample = self.data.fetch_sample().await;
        self.next_round_at = None;
        self.engine.start_round(sample, &mut self.presenter)
    }

    /// Apply a player action. Returns whether it was accepted.
    pub async fn act(&mut self, action: Action) -> Result<bool, RoundError> {
        if !self.engine.accepts_input() {
            log::debug!(
                "Ignoring {:?} while the game is {:?}",
                action,
                self.engine.phase()
            );
            return Ok(false);
        }
        self.engine.evaluate(action, &mut self.presenter)?;
        self.resolve().await?;
        Ok(true)
    }

    /// Advance one clock unit of the running round.
    pub async fn tick(&mut self) -> Result<(), RoundError> {
        if self.engine.tick(&mut self.presenter)? == TickResult::TimedOut {
            self.resolve().await?;
        }
        Ok(())
    }

    /// Back to round one with a fresh score.
    pub async fn restart(&mut self) -> Result<(), RoundError> {
        log::info!("Restarting game");
        self.engine.restart();
        self.start_round().await
    }

    /// Leave a resolved round: schedule the next one or finish the game.
    async fn resolve(&mut self) -> Result<(), RoundError> {
        let advance = self.engine.advance_round(&mut self.presenter)?;
        match advance {
            Advance::NextRound { delay, .. } => {
                self.next_round_at = Some(Instant::now() + delay);
            }
            Advance::GameOver { final_score } => self.finish(final_score).await,
        }
        Ok(())
    }

    async fn finish(&mut self, final_score: u32) {
        log::info!("Game over for {} with score {}", self.player, final_score);
        self.scores.submit(&self.player, final_score).await;
        let top = self.scores.fetch_top(REMOTE_LIMIT).await;
        self.presenter.on_leaderboard(&top);
    }

    /// Play until `Quit` or the command channel closes. Returns the score of
    /// the last game.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> Result<u32, RoundError> {
        self.start_round().await?;
        let mut ticker = self.ticker();

        loop {
            let running = self.engine.phase() == GamePhase::RoundActive;
            let next_round_at = self.next_round_at;

            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(SessionCommand::Quit) => break,
                    Some(SessionCommand::Act(action)) => {
                        self.act(action).await?;
                    }
                    Some(SessionCommand::Restart) => {
                        self.restart().await?;
                        ticker = self.ticker();
                    }
                },
                _ = ticker.tick(), if running => {
                    self.tick().await?;
                }
                _ = time::sleep_until(next_round_at.unwrap_or_else(Instant::now)),
                    if next_round_at.is_some() =>
                {
                    self.start_round().await?;
                    ticker = self.ticker();
                }
            }
        }

        Ok(self.engine.state().score)
    }

    /// Fresh ticker whose first tick lands one unit from now.
    fn ticker(&self) -> Interval {
        let mut ticker = time::interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}
