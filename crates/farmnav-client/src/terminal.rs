//! Terminal front-end: a presenter that writes text and a stdin reader that
//! turns lines into session commands.

use std::io::{self, Stdout, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use farmnav_logic::decision::{self, Action};
use farmnav_logic::leaderboard::ScoreEntry;
use farmnav_logic::presentation::PresentationAdapter;
use farmnav_logic::sample::EnvironmentSample;

use crate::session::SessionCommand;

/// Countdown values worth printing; the rest would flood the screen.
const ANNOUNCED_SECONDS: [u32; 4] = [9, 6, 3, 1];

pub const HELP: &str = "Commands: [i]rrigate, [n]o / don't irrigate, [r]estart, [q]uit";

pub struct TerminalPresenter<W: Write = Stdout> {
    out: W,
    total_rounds: u32,
    score: u32,
    sample: Option<EnvironmentSample>,
}

impl TerminalPresenter<Stdout> {
    pub fn stdout(total_rounds: u32) -> Self {
        Self::new(io::stdout(), total_rounds)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, total_rounds: u32) -> Self {
        Self {
            out,
            total_rounds,
            score: 0,
            sample: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Banner printed before the first round.
    pub fn intro(&mut self, player: &str, fact: &str) {
        self.line(format_args!("NASA Farm Navigator, playing as {}", player));
        self.line(format_args!("Did you know? {}", fact));
        self.line(format_args!(
            "Irrigate only when the soil is dry and no heavy rain is coming."
        ));
        self.line(format_args!("{}", HELP));
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        // write errors on a closed terminal are ignored
        let _ = writeln!(self.out, "{}", args);
        let _ = self.out.flush();
    }

    fn explain_last(&mut self) {
        if let Some(sample) = self.sample {
            self.line(format_args!(
                "  {} (best choice: {})",
                decision::explain(&sample),
                decision::correct_action(&sample).label()
            ));
        }
    }
}

impl<W: Write> PresentationAdapter for TerminalPresenter<W> {
    fn on_round_started(&mut self, round_index: u32, sample: &EnvironmentSample) {
        if round_index == 1 {
            self.score = 0;
        }
        self.sample = Some(*sample);
        let total_rounds = self.total_rounds;
        self.line(format_args!(
            "\nRound {}/{} | soil moisture: {} ({}%) | rainfall forecast: {}",
            round_index,
            total_rounds,
            sample.soil_moisture_level.label(),
            sample.soil_moisture_pct,
            sample.rainfall_forecast.label()
        ));
        self.line(format_args!("Irrigate? [i/n]"));
    }

    fn on_evaluated(&mut self, correct: bool, action: Action) {
        if correct {
            self.score += 1;
            self.line(format_args!("Correct! You chose to {}.", action.label()));
        } else {
            self.line(format_args!("Not quite. You chose to {}.", action.label()));
        }
        self.explain_last();
    }

    fn on_timeout(&mut self) {
        self.line(format_args!("Time's up!"));
        self.explain_last();
    }

    fn on_round_advanced(&mut self, round_index: u32) {
        let score = self.score;
        self.line(format_args!(
            "Score {}. Round {} coming up...",
            score, round_index
        ));
    }

    fn on_game_over(&mut self, final_score: u32) {
        let total_rounds = self.total_rounds;
        self.line(format_args!(
            "\nGame over! Final score: {}/{}",
            final_score, total_rounds
        ));
    }

    fn on_tick(&mut self, seconds_remaining: u32) {
        if ANNOUNCED_SECONDS.contains(&seconds_remaining) {
            self.line(format_args!("  {}s left", seconds_remaining));
        }
    }

    fn on_leaderboard(&mut self, entries: &[ScoreEntry]) {
        if entries.is_empty() {
            self.line(format_args!("No scores recorded yet."));
        } else {
            self.line(format_args!("Leaderboard"));
            for (rank, entry) in entries.iter().enumerate() {
                self.line(format_args!(
                    "{:>3}. {:<32} {:>2}  {}",
                    rank + 1,
                    entry.player_name,
                    entry.score,
                    entry.timestamp.format("%Y-%m-%d")
                ));
            }
        }
        self.line(format_args!("[r]estart or [q]uit"));
    }
}

/// Map one line of input to a command. Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "i" | "y" | "yes" | "irrigate" => Some(SessionCommand::Act(Action::Irrigate)),
        "n" | "no" | "d" | "dont" | "don't" => Some(SessionCommand::Act(Action::DoNotIrrigate)),
        "r" | "restart" => Some(SessionCommand::Restart),
        "q" | "quit" | "exit" => Some(SessionCommand::Quit),
        _ => None,
    }
}

/// Read stdin line by line until EOF or the session goes away.
pub fn spawn_stdin_reader(commands: mpsc::Sender<SessionCommand>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("stdin read failed: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Some(command) => {
                    // no read may be pending when the runtime shuts down
                    if commands.send(command).await.is_err() || command == SessionCommand::Quit {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{}", HELP),
            }
        }
        log::debug!("stdin reader finished");
    })
}
