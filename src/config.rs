use crate::bays::{BayState, BAY_COUNT, DEFAULT_BAY_LAYOUT};
use crate::fault::DEFAULT_CRITICAL_THRESHOLD_C;
use crate::telemetry::{DEFAULT_CAPACITY, DEFAULT_INITIAL_SAMPLES, NOMINAL_MEAN_C, NOMINAL_STDDEV_C};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building an engine from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("telemetry capacity must be at least 1")]
    ZeroCapacity,
    #[error("initial sample count {initial} exceeds telemetry capacity {capacity}")]
    InitialExceedsCapacity { initial: usize, capacity: usize },
    #[error("invalid sample distribution: mean {mean_c}°C, stddev {stddev_c}°C")]
    InvalidDistribution { mean_c: f64, stddev_c: f64 },
    #[error("invalid critical threshold {0}°C")]
    InvalidThreshold(f64),
    #[error("expected {expected} service bays, got {actual}")]
    BayCount { expected: usize, actual: usize },
    #[error("failed to parse engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub capacity: usize,
    pub initial_samples: usize,
    pub mean_c: f64,
    pub stddev_c: f64,
    pub critical_threshold_c: f64,
    pub initial_bays: Vec<BayState>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            initial_samples: DEFAULT_INITIAL_SAMPLES,
            mean_c: NOMINAL_MEAN_C,
            stddev_c: NOMINAL_STDDEV_C,
            critical_threshold_c: DEFAULT_CRITICAL_THRESHOLD_C,
            initial_bays: DEFAULT_BAY_LAYOUT.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as the default configuration but with every bay already booked.
    pub fn fully_booked() -> Self {
        Self {
            initial_bays: vec![BayState::Booked; BAY_COUNT],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.initial_samples > self.capacity {
            return Err(ConfigError::InitialExceedsCapacity {
                initial: self.initial_samples,
                capacity: self.capacity,
            });
        }

        if !self.mean_c.is_finite() || !self.stddev_c.is_finite() || self.stddev_c < 0.0 {
            return Err(ConfigError::InvalidDistribution {
                mean_c: self.mean_c,
                stddev_c: self.stddev_c,
            });
        }

        if !self.critical_threshold_c.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.critical_threshold_c));
        }

        if self.initial_bays.len() != BAY_COUNT {
            return Err(ConfigError::BayCount {
                expected: BAY_COUNT,
                actual: self.initial_bays.len(),
            });
        }

        Ok(())
    }
}
