use serde::{Deserialize, Serialize};

/// Substring that identifies the critical-event entry.
pub const CRITICAL_MARKER: &str = "CRITICAL EVENT";

/// Scripted agent narration.
pub mod narration {
    pub const ANALYSIS_STARTED: &str = "🔍 Analyzing sensor data stream...";
    pub const ANOMALY_DETECTED: &str =
        "🤖 Master Agent: Anomaly Detected. Probability of failure: 98%.";
    pub const DELEGATED_TO_VOICE_AGENT: &str = "📞 Delegating to Voice Agent for customer outreach.";

    pub fn critical_event(threshold_c: f64) -> String {
        format!("⚠️ {}: Engine Temperature > {threshold_c:.0}°C", super::CRITICAL_MARKER)
    }

    pub fn booking_accepted(bay: usize) -> String {
        format!("✅ Customer accepted. Service Bay {bay} booked.")
    }
}

/// Append-only agent dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLog {
    entries: Vec<String>,
}

impl DialogueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A second critical-marker entry is dropped; returns
    /// whether the entry was stored.
    pub fn append(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if entry.contains(CRITICAL_MARKER) && self.contains_marker() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_marker(&self) -> bool {
        self.entries.iter().any(|e| e.contains(CRITICAL_MARKER))
    }
}
