use crate::config::ConfigError;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 30;
pub const DEFAULT_INITIAL_SAMPLES: usize = 20;

// Engine coolant temperature under normal driving
pub const NOMINAL_MEAN_C: f64 = 80.0;
pub const NOMINAL_STDDEV_C: f64 = 2.0;

/// Escalating spike appended when a critical fault is simulated.
pub const FAULT_BURST_C: [f64; 4] = [110.0, 125.0, 138.0, 142.0];

static_assertions::const_assert!(DEFAULT_INITIAL_SAMPLES <= DEFAULT_CAPACITY);

/// Anything that can produce engine temperature readings.
pub trait TemperatureSource {
    fn next_sample(&mut self) -> f64;
}

/// Gaussian temperature source driven by an injectable RNG.
///
/// Seed the RNG (e.g. `StdRng::seed_from_u64`) to get reproducible sample
/// streams in tests.
#[derive(Debug, Clone)]
pub struct NormalSampler<R> {
    rng: R,
    distribution: Normal<f64>,
}

impl<R: Rng> NormalSampler<R> {
    pub fn new(rng: R, mean_c: f64, stddev_c: f64) -> Result<Self, ConfigError> {
        // Normal::new accepts a negative stddev
        if !mean_c.is_finite() || !stddev_c.is_finite() || stddev_c < 0.0 {
            return Err(ConfigError::InvalidDistribution { mean_c, stddev_c });
        }

        let distribution = Normal::new(mean_c, stddev_c)
            .map_err(|_| ConfigError::InvalidDistribution { mean_c, stddev_c })?;

        Ok(Self { rng, distribution })
    }

    pub fn mean(&self) -> f64 {
        self.distribution.mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.distribution.std_dev()
    }
}

impl<R: Rng> TemperatureSource for NormalSampler<R> {
    fn next_sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

/// Sliding window of temperature samples, oldest first.
///
/// Normal appends trim the window back to `capacity`. A fault burst is
/// appended without trimming, so the window may run past `capacity` until
/// the next normal append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl TelemetryBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + FAULT_BURST_C.len()),
            capacity,
        }
    }

    /// Build a window pre-filled with `initial` draws from `source`.
    pub fn seeded<S: TemperatureSource>(capacity: usize, initial: usize, source: &mut S) -> Self {
        let mut buffer = Self::with_capacity(capacity);
        for _ in 0..initial {
            buffer.push_trimmed(source.next_sample());
        }
        buffer
    }

    /// Draw one sample and append it, evicting the oldest samples while the
    /// window is over capacity.
    pub fn append_normal<S: TemperatureSource>(&mut self, source: &mut S) {
        let sample = source.next_sample();
        self.push_trimmed(sample);
        debug!(sample_c = sample, len = self.samples.len(), "appended telemetry sample");
    }

    pub fn append_fault_burst(&mut self) {
        self.samples.extend(FAULT_BURST_C);
        debug!(len = self.samples.len(), "appended fault burst");
    }

    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn peak(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    fn push_trimmed(&mut self, sample: f64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            if let Some(evicted) = self.samples.pop_front() {
                debug!(evicted_c = evicted, "evicted oldest telemetry sample");
            }
        }
    }
}
