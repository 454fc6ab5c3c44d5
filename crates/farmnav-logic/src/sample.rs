//! Environmental samples: the reading presented to the player each round.
//!
//! A sample is produced fresh per round, either by the backend or locally,
//! and never changes once issued.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::sampling::{HEAVY_RAIN_PROBABILITY, LOW_MOISTURE_THRESHOLD_PCT};

/// Soil moisture category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilMoisture {
    Low,
    High,
}

impl SoilMoisture {
    /// Category for a raw moisture percentage.
    pub fn from_percent(pct: f64) -> Self {
        if pct < LOW_MOISTURE_THRESHOLD_PCT {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Low, Self::High]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Rainfall forecast for the coming period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rainfall {
    None,
    Heavy,
}

impl Rainfall {
    pub fn all() -> [Self; 2] {
        [Self::None, Self::Heavy]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Heavy => "heavy",
        }
    }
}

/// One round's environmental reading.
///
/// Field names match the `/api/nasa-data` wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSample {
    #[serde(rename = "soil_moisture")]
    pub soil_moisture_level: SoilMoisture,
    /// Rounded moisture percentage, 0–100.
    pub soil_moisture_pct: u8,
    pub rainfall_forecast: Rainfall,
}

impl EnvironmentSample {
    pub fn new(
        soil_moisture_level: SoilMoisture,
        soil_moisture_pct: u8,
        rainfall_forecast: Rainfall,
    ) -> Self {
        Self {
            soil_moisture_level,
            soil_moisture_pct,
            rainfall_forecast,
        }
    }

    /// Draw a sample from independent uniform draws.
    ///
    /// The category comes from the raw draw; the reported percentage is the
    /// draw rounded, so a draw of 44.6 is reported as 45 but stays `Low`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let pct: f64 = rng.gen_range(0.0..100.0);
        let rain: f64 = rng.gen();
        let rainfall_forecast = if rain < 1.0 - HEAVY_RAIN_PROBABILITY {
            Rainfall::None
        } else {
            Rainfall::Heavy
        };
        Self {
            soil_moisture_level: SoilMoisture::from_percent(pct),
            soil_moisture_pct: pct.round().min(100.0) as u8,
            rainfall_forecast,
        }
    }

    /// Whether a sample received from elsewhere is within range and its
    /// category agrees with its percentage.
    ///
    /// The percentage is rounded, so exactly the threshold is valid for both
    /// categories.
    pub fn is_well_formed(&self) -> bool {
        let pct = f64::from(self.soil_moisture_pct);
        let agrees = match self.soil_moisture_level {
            SoilMoisture::Low => pct <= LOW_MOISTURE_THRESHOLD_PCT,
            SoilMoisture::High => pct >= LOW_MOISTURE_THRESHOLD_PCT,
        };
        self.soil_moisture_pct <= 100 && agrees
    }

    /// Every category combination, with a representative percentage.
    pub fn all_combinations() -> Vec<Self> {
        let mut out = Vec::with_capacity(4);
        for soil in SoilMoisture::all() {
            for rain in Rainfall::all() {
                let pct = match soil {
                    SoilMoisture::Low => 20,
                    SoilMoisture::High => 70,
                };
                out.push(Self::new(soil, pct, rain));
            }
        }
        out
    }
}
