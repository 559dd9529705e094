//! Fixed texts produced by the voice and quality agents.

use core::fmt;
use serde::Serialize;

pub const STATUS_NORMAL: &str = "System Normal. Monitoring protocols active...";
pub const APPOINTMENT_CONFIRMED: &str = "Appointment Confirmed.";

pub const VOICE_AGENT_SCRIPT: &str = "Hello, we detected a potential issue with your engine cooling \
system. I can book you a service appointment immediately. Shall I proceed?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Root cause analysis issued once a service bay is booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RootCauseReport {
    pub error_code: &'static str,
    pub component: &'static str,
    pub severity: Severity,
    pub action: &'static str,
}

impl RootCauseReport {
    pub const fn coolant_temperature_sensor() -> Self {
        Self {
            error_code: "P0117",
            component: "Coolant Temperature Sensor",
            severity: Severity::High,
            action: "Inspect connector and harness. Replace sensor if necessary.",
        }
    }
}

impl fmt::Display for RootCauseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generating Report...")?;
        writeln!(f)?;
        writeln!(f, "- Error Code: {}", self.error_code)?;
        writeln!(f, "- Component: {}", self.component)?;
        writeln!(f, "- Severity: {}", self.severity)?;
        write!(f, "- Action: {}", self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_rendering() {
        let report = RootCauseReport::coolant_temperature_sensor();
        assert_eq!(
            report.to_string(),
            "Generating Report...\n\n- Error Code: P0117\n- Component: Coolant Temperature Sensor\n\
             - Severity: High\n- Action: Inspect connector and harness. Replace sensor if necessary."
        );
    }

    #[test]
    fn test_voice_script_is_single_line() {
        assert!(!VOICE_AGENT_SCRIPT.contains('\n'));
        assert!(VOICE_AGENT_SCRIPT.contains("engine cooling system"));
    }
}
