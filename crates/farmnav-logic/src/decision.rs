//! Irrigation decisions and the rule that scores them.

use serde::{Deserialize, Serialize};

use crate::sample::{EnvironmentSample, Rainfall, SoilMoisture};

/// What the player chose to do this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Irrigate,
    DoNotIrrigate,
}

impl Action {
    pub fn all() -> [Self; 2] {
        [Self::Irrigate, Self::DoNotIrrigate]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Irrigate => "irrigate",
            Self::DoNotIrrigate => "do not irrigate",
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
    /// The clock ran out. Scored like an incorrect answer.
    TimedOut,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Whether `action` is the right call for `sample`.
///
/// Irrigate only when the soil is dry and no rain is coming; hold off when
/// the soil is already wet or heavy rain is forecast. The two conditions are
/// complements, so exactly one action is correct for any sample.
pub fn is_correct(action: Action, sample: &EnvironmentSample) -> bool {
    let dry = sample.soil_moisture_level == SoilMoisture::Low;
    let rain_coming = sample.rainfall_forecast == Rainfall::Heavy;
    match action {
        Action::Irrigate => dry && !rain_coming,
        Action::DoNotIrrigate => !dry || rain_coming,
    }
}

/// The single correct action for `sample`.
pub fn correct_action(sample: &EnvironmentSample) -> Action {
    if is_correct(Action::Irrigate, sample) {
        Action::Irrigate
    } else {
        Action::DoNotIrrigate
    }
}

/// Outcome of answering `sample` with `action`.
pub fn judge(action: Action, sample: &EnvironmentSample) -> Outcome {
    if is_correct(action, sample) {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// One-line reason behind the correct action, shown after the round.
pub fn explain(sample: &EnvironmentSample) -> &'static str {
    match (sample.soil_moisture_level, sample.rainfall_forecast) {
        (SoilMoisture::Low, Rainfall::None) => {
            "Soil is dry and no rain is forecast: irrigate to protect the crop."
        }
        (SoilMoisture::Low, Rainfall::Heavy) => {
            "Soil is dry but heavy rain is on the way: let the rain do the work."
        }
        (SoilMoisture::High, Rainfall::None) => {
            "Soil already holds plenty of water: irrigating would waste it."
        }
        (SoilMoisture::High, Rainfall::Heavy) => {
            "Wet soil and heavy rain ahead: irrigating risks waterlogging."
        }
    }
}
