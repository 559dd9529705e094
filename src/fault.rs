use serde::{Deserialize, Serialize};

pub const DEFAULT_CRITICAL_THRESHOLD_C: f64 = 120.0;

/// Latched fault flag. Once raised it stays raised for the rest of the
/// session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultEvent {
    triggered: bool,
}

impl FaultEvent {
    /// Raise the flag. Returns `true` only on the first call.
    pub fn raise(&mut self) -> bool {
        let newly_raised = !self.triggered;
        self.triggered = true;
        newly_raised
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

/// Threshold predicate over temperature readings.
///
/// The engine treats [`FaultEvent`] as the only source of truth for whether
/// a fault is active; the detector only words the narration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultDetector {
    threshold_c: f64,
}

impl FaultDetector {
    pub fn new(threshold_c: f64) -> Self {
        Self { threshold_c }
    }

    pub fn threshold_c(&self) -> f64 {
        self.threshold_c
    }

    pub fn is_critical<I>(&self, samples: I) -> bool
    where
        I: IntoIterator<Item = f64>,
    {
        self.first_critical(samples).is_some()
    }

    /// First reading at or above the threshold, in window order.
    pub fn first_critical<I>(&self, samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        samples.into_iter().find(|&s| s >= self.threshold_c)
    }
}

impl Default for FaultDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRITICAL_THRESHOLD_C)
    }
}
