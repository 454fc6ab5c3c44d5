//! Farm Navigator Headless Harness
//!
//! Validates the game rules end to end without a server, a terminal or an
//! async runtime.
//!
//! Usage:
//!   cargo run -p farmnav-simtest
//!   cargo run -p farmnav-simtest -- --verbose --seed 42

use clap::Parser;
use farmnav_logic::constants::scores::LOCAL_CAP;
use farmnav_logic::constants::{sampling, TOTAL_ROUNDS};
use farmnav_logic::decision::{self, Action};
use farmnav_logic::facts::{self, NASA_FACTS};
use farmnav_logic::leaderboard::{Leaderboard, ScoreEntry};
use farmnav_logic::persistence;
use farmnav_logic::presentation::{PresentationEvent, RecordingPresenter};
use farmnav_logic::round::{Advance, GameConfig, GamePhase, RoundEngine, RoundError, TickResult};
use farmnav_logic::sample::{EnvironmentSample, Rainfall, SoilMoisture};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLE_DRAWS: usize = 20_000;
/// Allowed deviation of an observed frequency from its expected value.
const FREQUENCY_TOLERANCE: f64 = 0.02;

#[derive(Parser, Debug)]
#[command(about = "Headless checks for the Farm Navigator rules")]
struct HarnessArgs {
    /// Print every check, not only failures.
    #[arg(long)]
    verbose: bool,

    /// Seed for sampling and scripted games.
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let HarnessArgs { verbose, seed } = HarnessArgs::parse();
    println!("=== Farm Navigator Harness (seed {}) ===\n", seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut results = Vec::new();

    // 1. Decision rule over the whole sample space
    results.extend(validate_decision_rule(verbose));

    // 2. Local sample generation
    results.extend(validate_sampling(&mut rng, verbose));

    // 3. Scripted games through the round engine
    results.extend(validate_games(&mut rng, verbose));

    // 4. Leaderboard ordering, capping and the file format
    results.extend(validate_leaderboard(&mut rng, verbose));

    // 5. Facts and wire names
    results.extend(validate_catalogue_and_wire(&mut rng, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Decision rule ────────────────────────────────────────────────────

fn validate_decision_rule(verbose: bool) -> Vec<TestResult> {
    println!("--- Decision Rule ---");
    let mut results = Vec::new();
    let combos = EnvironmentSample::all_combinations();

    // Exactly one action is right for every sample
    let ambiguous: Vec<_> = combos
        .iter()
        .filter(|s| {
            Action::all()
                .iter()
                .filter(|a| decision::is_correct(**a, s))
                .count()
                != 1
        })
        .collect();
    results.push(TestResult {
        name: "one_correct_action_per_sample".into(),
        passed: ambiguous.is_empty(),
        detail: format!("{} samples, {} ambiguous", combos.len(), ambiguous.len()),
    });

    // Irrigate only for dry soil with no rain coming
    let mut wrong = Vec::new();
    for s in &combos {
        let expect_irrigate =
            s.soil_moisture_level == SoilMoisture::Low && s.rainfall_forecast == Rainfall::None;
        let irrigate = decision::is_correct(Action::Irrigate, s);
        if verbose {
            println!(
                "  soil={:<4} rain={:<5} -> {}",
                s.soil_moisture_level.label(),
                s.rainfall_forecast.label(),
                decision::correct_action(s).label()
            );
        }
        if irrigate != expect_irrigate {
            wrong.push(*s);
        }
    }
    results.push(TestResult {
        name: "irrigate_iff_dry_and_no_rain".into(),
        passed: wrong.is_empty(),
        detail: format!("{} mismatches", wrong.len()),
    });

    // Each case has its own explanation
    let mut texts: Vec<&str> = combos.iter().map(decision::explain).collect();
    texts.sort_unstable();
    texts.dedup();
    results.push(TestResult {
        name: "explanations_distinct".into(),
        passed: texts.len() == combos.len() && texts.iter().all(|t| !t.is_empty()),
        detail: format!("{} distinct explanations", texts.len()),
    });

    results
}

// ── 2. Sampling ─────────────────────────────────────────────────────────

fn validate_sampling(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Sampling ---");
    let mut results = Vec::new();
    let samples: Vec<EnvironmentSample> = (0..SAMPLE_DRAWS)
        .map(|_| EnvironmentSample::random(rng))
        .collect();

    let malformed = samples.iter().filter(|s| !s.is_well_formed()).count();
    results.push(TestResult {
        name: "samples_well_formed".into(),
        passed: malformed == 0,
        detail: format!("{} of {} malformed", malformed, SAMPLE_DRAWS),
    });

    // Level and reported percentage agree up to rounding at the threshold
    let threshold = sampling::LOW_MOISTURE_THRESHOLD_PCT as u8;
    let inconsistent = samples
        .iter()
        .filter(|s| match s.soil_moisture_level {
            SoilMoisture::Low => s.soil_moisture_pct > threshold,
            SoilMoisture::High => s.soil_moisture_pct < threshold,
        })
        .count();
    results.push(TestResult {
        name: "level_matches_percentage".into(),
        passed: inconsistent == 0,
        detail: format!("{} inconsistent", inconsistent),
    });

    let low = fraction(&samples, |s| s.soil_moisture_level == SoilMoisture::Low);
    let expected_low = sampling::LOW_MOISTURE_THRESHOLD_PCT / 100.0;
    results.push(TestResult {
        name: "low_moisture_frequency".into(),
        passed: (low - expected_low).abs() < FREQUENCY_TOLERANCE,
        detail: format!("{:.3} (expected {:.3})", low, expected_low),
    });

    let none = fraction(&samples, |s| s.rainfall_forecast == Rainfall::None);
    let expected_none = 1.0 - sampling::HEAVY_RAIN_PROBABILITY;
    results.push(TestResult {
        name: "no_rain_frequency".into(),
        passed: (none - expected_none).abs() < FREQUENCY_TOLERANCE,
        detail: format!("{:.3} (expected {:.3})", none, expected_none),
    });

    let irrigate = fraction(&samples, |s| {
        decision::correct_action(s) == Action::Irrigate
    });
    if verbose {
        println!("  irrigate is correct in {:.1}% of rounds", irrigate * 100.0);
    }

    results
}

fn fraction(samples: &[EnvironmentSample], pred: impl Fn(&EnvironmentSample) -> bool) -> f64 {
    samples.iter().filter(|s| pred(*s)).count() as f64 / samples.len() as f64
}

// ── 3. Games ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Strategy {
    Perfect,
    Contrary,
    Idle,
    Coin,
}

/// Play one game with `strategy` and return (score, game-over events).
fn play(strategy: Strategy, rng: &mut StdRng) -> Result<(u32, usize), RoundError> {
    let mut engine = RoundEngine::new(GameConfig::default());
    let mut presenter = RecordingPresenter::new();
    engine.start_round(EnvironmentSample::random(rng), &mut presenter)?;
    let final_score = loop {
        let sample = engine
            .state()
            .current_sample
            .ok_or(RoundError::InvalidTransition {
                operation: "read the sample",
                phase: engine.phase(),
            })?;
        let right = decision::correct_action(&sample);
        let opposite = match right {
            Action::Irrigate => Action::DoNotIrrigate,
            Action::DoNotIrrigate => Action::Irrigate,
        };
        match strategy {
            Strategy::Perfect => {
                engine.evaluate(right, &mut presenter)?;
            }
            Strategy::Contrary => {
                engine.evaluate(opposite, &mut presenter)?;
            }
            Strategy::Idle => while engine.tick(&mut presenter)? != TickResult::TimedOut {},
            Strategy::Coin => {
                let action = if rng.gen_bool(0.5) { right } else { opposite };
                engine.evaluate(action, &mut presenter)?;
            }
        }
        match engine.advance_round(&mut presenter)? {
            Advance::NextRound { .. } => {
                engine.start_round(EnvironmentSample::random(rng), &mut presenter)?
            }
            Advance::GameOver { final_score } => break final_score,
        }
    };
    Ok((final_score, presenter.game_over_count()))
}

fn validate_games(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Games ---");
    let mut results = Vec::new();

    for (strategy, expected) in [
        (Strategy::Perfect, Some(TOTAL_ROUNDS)),
        (Strategy::Contrary, Some(0)),
        (Strategy::Idle, Some(0)),
        (Strategy::Coin, None),
    ] {
        let name = format!("game_{:?}", strategy).to_lowercase();
        match play(strategy, rng) {
            Ok((score, overs)) => {
                let in_range = score <= TOTAL_ROUNDS;
                let matches = expected.map_or(true, |e| e == score);
                if verbose {
                    println!("  {:?}: {}/{}", strategy, score, TOTAL_ROUNDS);
                }
                results.push(TestResult {
                    name,
                    passed: in_range && matches && overs == 1,
                    detail: format!("score {}, {} game-over events", score, overs),
                });
            }
            Err(e) => results.push(TestResult {
                name,
                passed: false,
                detail: format!("engine error: {}", e),
            }),
        }
    }

    // Out-of-phase calls are rejected and change nothing
    let mut engine = RoundEngine::new(GameConfig::default());
    let mut presenter = RecordingPresenter::new();
    let idle_eval = engine.evaluate(Action::Irrigate, &mut presenter).is_err();
    let idle_tick = engine.tick(&mut presenter).is_err();
    let idle_advance = engine.advance_round(&mut presenter).is_err();
    results.push(TestResult {
        name: "idle_rejects_play".into(),
        passed: idle_eval
            && idle_tick
            && idle_advance
            && presenter.events.is_empty()
            && engine.phase() == GamePhase::Idle,
        detail: format!("{} events emitted", presenter.events.len()),
    });

    // A timed-out round cannot be answered afterwards
    let mut presenter = RecordingPresenter::new();
    let late_answer = engine
        .start_round(EnvironmentSample::random(rng), &mut presenter)
        .and_then(|_| {
            while engine.tick(&mut presenter)? != TickResult::TimedOut {}
            Ok(engine.evaluate(Action::Irrigate, &mut presenter).is_err())
        });
    results.push(TestResult {
        name: "no_answer_after_timeout".into(),
        passed: late_answer == Ok(true)
            && engine.state().score == 0
            && presenter.count(|e| matches!(e, PresentationEvent::Evaluated { .. })) == 0,
        detail: format!("{:?}", late_answer),
    });

    results
}

// ── 4. Leaderboard ──────────────────────────────────────────────────────

fn validate_leaderboard(rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Leaderboard ---");
    let mut results = Vec::new();

    let mut board = Leaderboard::new(LOCAL_CAP);
    for i in 0..(LOCAL_CAP * 4) {
        let score = rng.gen_range(0..=TOTAL_ROUNDS);
        board.insert(ScoreEntry::now(&format!("{:04}", i), score));
    }

    results.push(TestResult {
        name: "local_cap_enforced".into(),
        passed: board.len() == LOCAL_CAP,
        detail: format!("{} entries kept", board.len()),
    });

    // Names are insertion sequence numbers, so ties must keep them ascending
    let ordered = board.entries().windows(2).all(|w| {
        w[0].score > w[1].score
            || (w[0].score == w[1].score && w[0].player_name < w[1].player_name)
    });
    results.push(TestResult {
        name: "descending_ties_in_insertion_order".into(),
        passed: ordered,
        detail: format!(
            "top score {}",
            board.entries().first().map_or(0, |e| e.score)
        ),
    });

    let bounded = [0, 1, 5, 20, LOCAL_CAP, LOCAL_CAP * 2]
        .iter()
        .all(|&n| board.top(n).len() == n.min(board.len()));
    results.push(TestResult {
        name: "top_n_bounded".into(),
        passed: bounded,
        detail: "top(n) never exceeds n".into(),
    });

    let mut buf = Vec::new();
    let reloaded = persistence::save_scores(&mut buf, &board)
        .and_then(|_| persistence::load_scores(&buf[..], LOCAL_CAP));
    if verbose {
        println!("  record list file: {} bytes", buf.len());
    }
    results.push(TestResult {
        name: "record_list_file_round_trip".into(),
        passed: matches!(&reloaded, Ok(b) if b.entries() == board.entries()),
        detail: match &reloaded {
            Ok(b) => format!("{} entries reloaded", b.len()),
            Err(e) => format!("error: {}", e),
        },
    });

    results
}

// ── 5. Catalogue and wire format ────────────────────────────────────────

fn validate_catalogue_and_wire(rng: &mut StdRng, _verbose: bool) -> Vec<TestResult> {
    println!("--- Facts & Wire Format ---");
    let mut results = Vec::new();

    let fact = facts::random_fact(rng);
    results.push(TestResult {
        name: "fact_from_catalogue".into(),
        passed: !NASA_FACTS.is_empty() && NASA_FACTS.contains(&fact),
        detail: format!("{} facts", NASA_FACTS.len()),
    });

    let sample = EnvironmentSample::new(SoilMoisture::Low, 31, Rainfall::Heavy);
    let sample_ok = serde_json::to_value(sample).map(|v| {
        v["soil_moisture"] == "low"
            && v["soil_moisture_pct"] == 31
            && v["rainfall_forecast"] == "heavy"
    });
    results.push(TestResult {
        name: "sample_wire_names".into(),
        passed: matches!(sample_ok, Ok(true)),
        detail: format!("{:?}", sample_ok),
    });

    let entry = ScoreEntry::now("  Ada  ", 4);
    let entry_ok = serde_json::to_value(&entry)
        .map(|v| v["player"] == "Ada" && v["score"] == 4 && v["date"].is_string());
    results.push(TestResult {
        name: "score_entry_wire_names".into(),
        passed: matches!(entry_ok, Ok(true)),
        detail: format!("{:?}", entry_ok),
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_seed() {
        let args = HarnessArgs::try_parse_from(["farmnav-simtest"]).unwrap();
        assert_eq!(args.seed, 7);
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_seed_and_verbose() {
        let args =
            HarnessArgs::try_parse_from(["farmnav-simtest", "--verbose", "--seed", "42"]).unwrap();
        assert_eq!(args.seed, 42);
        assert!(args.verbose);
    }

    #[test]
    fn test_args_invalid_seed_rejected() {
        assert!(HarnessArgs::try_parse_from(["farmnav-simtest", "--seed", "abc"]).is_err());
        assert!(HarnessArgs::try_parse_from(["farmnav-simtest", "--seed"]).is_err());
    }
}
