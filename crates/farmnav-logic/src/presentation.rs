//! Presentation callbacks driven by the round engine.
//!
//! The engine calls these synchronously at each transition. Implementations
//! own all display timing and must return promptly.

use crate::decision::Action;
use crate::leaderboard::ScoreEntry;
use crate::sample::EnvironmentSample;

pub trait PresentationAdapter {
    fn on_round_started(&mut self, round_index: u32, sample: &EnvironmentSample);

    fn on_evaluated(&mut self, correct: bool, action: Action);

    fn on_timeout(&mut self);

    fn on_round_advanced(&mut self, round_index: u32);

    fn on_game_over(&mut self, final_score: u32);

    /// Clock display. Called once per elapsed second while a round runs.
    fn on_tick(&mut self, _seconds_remaining: u32) {}

    /// Leaderboard shown after the game ends.
    fn on_leaderboard(&mut self, _entries: &[ScoreEntry]) {}
}

/// Adapter that discards everything.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl PresentationAdapter for NullPresenter {
    fn on_round_started(&mut self, _round_index: u32, _sample: &EnvironmentSample) {}
    fn on_evaluated(&mut self, _correct: bool, _action: Action) {}
    fn on_timeout(&mut self) {}
    fn on_round_advanced(&mut self, _round_index: u32) {}
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// A single adapter callback, as recorded by [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    RoundStarted {
        round_index: u32,
        sample: EnvironmentSample,
    },
    Evaluated {
        correct: bool,
        action: Action,
    },
    TimedOut,
    RoundAdvanced(u32),
    GameOver(u32),
    Tick(u32),
    Leaderboard(Vec<ScoreEntry>),
}

/// Adapter that keeps every callback in order. Used by tests and the harness.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresentationEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&PresentationEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn game_over_count(&self) -> usize {
        self.count(|e| matches!(e, PresentationEvent::GameOver(_)))
    }
}

impl PresentationAdapter for RecordingPresenter {
    fn on_round_started(&mut self, round_index: u32, sample: &EnvironmentSample) {
        self.events.push(PresentationEvent::RoundStarted {
            round_index,
            sample: *sample,
        });
    }

    fn on_evaluated(&mut self, correct: bool, action: Action) {
        self.events
            .push(PresentationEvent::Evaluated { correct, action });
    }

    fn on_timeout(&mut self) {
        self.events.push(PresentationEvent::TimedOut);
    }

    fn on_round_advanced(&mut self, round_index: u32) {
        self.events.push(PresentationEvent::RoundAdvanced(round_index));
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.events.push(PresentationEvent::GameOver(final_score));
    }

    fn on_tick(&mut self, seconds_remaining: u32) {
        self.events.push(PresentationEvent::Tick(seconds_remaining));
    }

    fn on_leaderboard(&mut self, entries: &[ScoreEntry]) {
        self.events
            .push(PresentationEvent::Leaderboard(entries.to_vec()));
    }
}
