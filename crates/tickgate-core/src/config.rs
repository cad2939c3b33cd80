//! Engine configuration.
//!
//! The engine takes a fully populated config at construction; there is no
//! partial-override merging at call time. Defaults are filled by `Default`
//! and ranges are checked once by [`PipelineConfig::validate`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Deployment environment, informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Immutable pipeline settings shared by the engine and its host.
///
/// `batch_size`, `max_latency_ms` and `sample_rate` are bookkeeping for
/// external orchestration; the engine itself only reads the two thresholds
/// and the dead-letter switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub environment: Environment,
    pub batch_size: usize,
    pub max_latency_ms: u64,
    pub price_change_threshold: f64,
    pub staleness_threshold_ms: u64,
    pub enable_dead_letter_queue: bool,
    pub sample_rate: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            batch_size: 500,
            max_latency_ms: 1_000,
            price_change_threshold: 0.10,
            staleness_threshold_ms: 60_000,
            enable_dead_letter_queue: true,
            sample_rate: 1.0,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size < MIN_BATCH_SIZE || self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::BatchSizeOutOfRange {
                value: self.batch_size,
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
            });
        }

        validate_unit_interval("price_change_threshold", self.price_change_threshold)?;
        validate_unit_interval("sample_rate", self.sample_rate)?;

        Ok(())
    }
}

fn validate_unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::UnitIntervalOutOfRange { field, value });
    }
    Ok(())
}
