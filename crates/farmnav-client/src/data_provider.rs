//! Per-round environmental samples and facts, remote first.
//!
//! Every fetch is bounded by a timeout. Any failure, including a sample that
//! parses but is out of range, falls back to a locally generated value, so a
//! fetch always yields something the round engine can use.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;

use farmnav_logic::facts;
use farmnav_logic::sample::EnvironmentSample;

use crate::backend::{bounded, Backend};
use crate::error::{log_fallback, ClientError};

pub struct DataProvider<B> {
    backend: Arc<B>,
    rng: StdRng,
    timeout: Duration,
}

impl<B: Backend> DataProvider<B> {
    pub fn new(backend: Arc<B>, rng: StdRng, timeout: Duration) -> Self {
        Self {
            backend,
            rng,
            timeout,
        }
    }

    /// One sample for the next round. Never fails.
    pub async fn fetch_sample(&mut self) -> EnvironmentSample {
        let remote = bounded(self.timeout, self.backend.fetch_sample()).await;
        match remote.and_then(|sample| {
            if sample.is_well_formed() {
                Ok(sample)
            } else {
                Err(ClientError::Malformed(format!(
                    "soil moisture {} at {}% is out of range",
                    sample.soil_moisture_level.label(),
                    sample.soil_moisture_pct
                )))
            }
        }) {
            Ok(sample) => sample,
            Err(e) => {
                log_fallback("Sample fetch", &e);
                EnvironmentSample::random(&mut self.rng)
            }
        }
    }

    /// A NASA fact for the intro screen. Never fails.
    pub async fn fetch_fact(&mut self) -> String {
        match bounded(self.timeout, self.backend.fetch_fact()).await {
            Ok(fact) => fact,
            Err(e) => {
                log_fallback("Fact fetch", &e);
                facts::random_fact(&mut self.rng).to_string()
            }
        }
    }
}
