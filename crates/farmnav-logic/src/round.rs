//! Round engine: the game's state machine.
//!
//! ```text
//! Idle ──start_round──▶ RoundActive ──evaluate / tick to 0──▶ RoundResolved
//!                            ▲                                     │
//!                            └────────start_round◀── NextRound ◀── advance_round
//!                                                    GameOver  ◀───┘
//! ```
//!
//! The engine owns round number, score and the clock, and notifies a
//! [`PresentationAdapter`] at every transition. It does no I/O and keeps no
//! real time: the caller fetches samples, drives `tick` once per time unit
//! and waits out the advance delay.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ADVANCE_DELAY_MS, ROUND_SECONDS, TOTAL_ROUNDS};
use crate::decision::{self, Action, Outcome};
use crate::presentation::PresentationAdapter;
use crate::sample::EnvironmentSample;

/// Which part of the game is running. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    RoundActive,
    RoundResolved,
    GameOver,
}

/// Fixed parameters of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub total_rounds: u32,
    pub round_seconds: u32,
    pub advance_delay: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: TOTAL_ROUNDS,
            round_seconds: ROUND_SECONDS,
            advance_delay: Duration::from_millis(ADVANCE_DELAY_MS),
        }
    }
}

/// Mutable state of one game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundState {
    /// 1-based; exceeds `total_rounds` only once the game is over.
    pub round_index: u32,
    pub total_rounds: u32,
    pub seconds_remaining: u32,
    /// `None` until the first round starts.
    pub current_sample: Option<EnvironmentSample>,
    pub score: u32,
    pub last_outcome: Option<Outcome>,
}

impl RoundState {
    fn fresh(config: &GameConfig) -> Self {
        Self {
            round_index: 1,
            total_rounds: config.total_rounds,
            seconds_remaining: config.round_seconds,
            current_sample: None,
            score: 0,
            last_outcome: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("cannot {operation} while the game is {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: GamePhase,
    },
}

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Running { seconds_remaining: u32 },
    TimedOut,
}

/// Result of leaving a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Start `round_index` after `delay`.
    NextRound { round_index: u32, delay: Duration },
    /// Last round done. Returned once per game.
    GameOver { final_score: u32 },
}

pub struct RoundEngine {
    config: GameConfig,
    state: RoundState,
    phase: GamePhase,
}

impl RoundEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: RoundState::fresh(&config),
            config,
            phase: GamePhase::Idle,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Player input is only meaningful while a round is running.
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::RoundActive
    }

    fn expect_phase(
        &self,
        operation: &'static str,
        allowed: &[GamePhase],
    ) -> Result<(), RoundError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RoundError::InvalidTransition {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Issue `sample` for the current round and reset the clock.
    pub fn start_round(
        &mut self,
        sample: EnvironmentSample,
        presenter: &mut dyn PresentationAdapter,
    ) -> Result<(), RoundError> {
        self.expect_phase("start a round", &[GamePhase::Idle, GamePhase::RoundResolved])?;
        self.state.current_sample = Some(sample);
        self.state.seconds_remaining = self.config.round_seconds;
        self.state.last_outcome = None;
        self.phase = GamePhase::RoundActive;
        log::debug!(
            "Round {}/{} started: {:?}",
            self.state.round_index,
            self.state.total_rounds,
            sample
        );
        presenter.on_round_started(self.state.round_index, &sample);
        Ok(())
    }

    /// Advance the clock by one unit. At zero the round resolves as a timeout.
    pub fn tick(
        &mut self,
        presenter: &mut dyn PresentationAdapter,
    ) -> Result<TickResult, RoundError> {
        self.expect_phase("tick the clock", &[GamePhase::RoundActive])?;
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        presenter.on_tick(self.state.seconds_remaining);
        if self.state.seconds_remaining > 0 {
            return Ok(TickResult::Running {
                seconds_remaining: self.state.seconds_remaining,
            });
        }

        self.state.last_outcome = Some(Outcome::TimedOut);
        self.phase = GamePhase::RoundResolved;
        log::debug!("Round {} timed out", self.state.round_index);
        presenter.on_timeout();
        Ok(TickResult::TimedOut)
    }

    /// Score the player's decision for the running round.
    pub fn evaluate(
        &mut self,
        action: Action,
        presenter: &mut dyn PresentationAdapter,
    ) -> Result<Outcome, RoundError> {
        self.expect_phase("evaluate an action", &[GamePhase::RoundActive])?;
        let sample = self
            .state
            .current_sample
            .ok_or(RoundError::InvalidTransition {
                operation: "evaluate an action",
                phase: self.phase,
            })?;

        let outcome = decision::judge(action, &sample);
        if outcome.is_correct() {
            self.state.score += 1;
        }
        self.state.last_outcome = Some(outcome);
        self.phase = GamePhase::RoundResolved;
        log::debug!(
            "Round {}: {:?} -> {:?} (score {})",
            self.state.round_index,
            action,
            outcome,
            self.state.score
        );
        presenter.on_evaluated(outcome.is_correct(), action);
        Ok(outcome)
    }

    /// Move past a resolved round, ending the game after the last one.
    pub fn advance_round(
        &mut self,
        presenter: &mut dyn PresentationAdapter,
    ) -> Result<Advance, RoundError> {
        self.expect_phase("advance the round", &[GamePhase::RoundResolved])?;
        self.state.round_index += 1;

        if self.state.round_index > self.config.total_rounds {
            self.phase = GamePhase::GameOver;
            let final_score = self.state.score;
            log::info!(
                "Game over: {}/{} correct",
                final_score,
                self.config.total_rounds
            );
            presenter.on_game_over(final_score);
            return Ok(Advance::GameOver { final_score });
        }

        presenter.on_round_advanced(self.state.round_index);
        Ok(Advance::NextRound {
            round_index: self.state.round_index,
            delay: self.config.advance_delay,
        })
    }

    /// Discard the current game and return to `Idle` with a clean slate.
    ///
    /// Accepted from any phase. The caller starts the first round.
    pub fn restart(&mut self) {
        log::debug!("Restarting from {:?}", self.phase);
        self.state = RoundState::fresh(&self.config);
        self.phase = GamePhase::Idle;
    }
}
