use crate::bays::{BayAllocator, BayError, BayStatus};
use crate::config::{ConfigError, EngineConfig};
use crate::dialogue::{narration, DialogueLog};
use crate::fault::{FaultDetector, FaultEvent};
use crate::report::{RootCauseReport, APPOINTMENT_CONFIRMED, STATUS_NORMAL, VOICE_AGENT_SCRIPT};
use crate::telemetry::{NormalSampler, TelemetryBuffer, TemperatureSource};
use core::str::FromStr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Workflow position of a session.
///
/// `AwaitingBookingDecision` is entered and left inside a single
/// [`SimulationEngine::accept_booking`] call, so [`SimulationEngine::state`]
/// never reports it; it only shows up in the engine's debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Monitoring,
    FaultDetected,
    AwaitingBookingDecision,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no free service bay available")]
    NoFreeBay,
    #[error("booking precondition failed: {reason}")]
    PreconditionFailed { reason: &'static str },
}

impl From<BayError> for EngineError {
    fn from(err: BayError) -> Self {
        match err {
            BayError::NoFreeBay => EngineError::NoFreeBay,
        }
    }
}

/// Actions a presentation layer can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    GenerateSample,
    TriggerFault,
    AcceptBooking,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}' (expected sample, fault, book or reset)")]
pub struct ParseActionError(pub alloc::string::String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sample" | "generate" | "tick" => Ok(Action::GenerateSample),
            "fault" | "trigger" => Ok(Action::TriggerFault),
            "book" | "accept" => Ok(Action::AcceptBooking),
            "reset" => Ok(Action::Reset),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Outcome {
    SampleAppended { latest_c: Option<f64> },
    FaultRaised,
    Booked { bay: usize },
    Reset,
}

/// Immutable view of engine state for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: EngineState,
    pub samples: alloc::vec::Vec<f64>,
    pub fault_triggered: bool,
    pub service_booked: bool,
    pub booked_bay: Option<usize>,
    pub bays: alloc::vec::Vec<BayStatus>,
    pub dialogue: alloc::vec::Vec<alloc::string::String>,
}

/// What a dashboard should show, derived from the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub status_banner: Option<&'static str>,
    pub show_voice_agent: bool,
    pub voice_agent_script: Option<&'static str>,
    pub show_booking_button: bool,
    pub show_confirmation: bool,
    pub confirmation: Option<&'static str>,
    pub report: Option<RootCauseReport>,
    pub critical_reading_c: Option<f64>,
}

/// Booking record. Set once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBooking {
    bay: Option<usize>,
}

impl ServiceBooking {
    pub fn is_booked(&self) -> bool {
        self.bay.is_some()
    }

    pub fn bay(&self) -> Option<usize> {
        self.bay
    }
}

/// Owns the telemetry window, fault latch, dialogue and bay table, and
/// routes every mutation through the transitions below.
///
/// ```text
/// Monitoring --trigger_fault--> FaultDetected --accept_booking--> Booked
///     ^  |                          ^  |                            ^ |
///     +--+ generate_normal_sample   +--+                            +-+
/// ```
pub struct SimulationEngine<S = NormalSampler<StdRng>> {
    config: EngineConfig,
    source: S,
    telemetry: TelemetryBuffer,
    detector: FaultDetector,
    fault: FaultEvent,
    critical_reading_c: Option<f64>,
    dialogue: DialogueLog,
    initial_bays: BayAllocator,
    bays: BayAllocator,
    booking: ServiceBooking,
}

impl SimulationEngine<NormalSampler<StdRng>> {
    /// Engine with an entropy-seeded sampler.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine whose sample stream is fully determined by `seed`.
    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SimulationEngine<NormalSampler<R>> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = NormalSampler::new(rng, config.mean_c, config.stddev_c)?;
        SimulationEngine::with_source(config, sampler)
    }
}

impl<S: TemperatureSource> SimulationEngine<S> {
    pub fn with_source(config: EngineConfig, mut source: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let bays = BayAllocator::with_layout(&config.initial_bays)?;
        let telemetry = TelemetryBuffer::seeded(config.capacity, config.initial_samples, &mut source);

        info!(
            capacity = config.capacity,
            initial_samples = config.initial_samples,
            free_bays = bays.free_count(),
            "simulation engine initialized"
        );

        Ok(Self {
            detector: FaultDetector::new(config.critical_threshold_c),
            fault: FaultEvent::default(),
            critical_reading_c: None,
            dialogue: DialogueLog::new(),
            initial_bays: bays.clone(),
            bays,
            booking: ServiceBooking::default(),
            telemetry,
            source,
            config,
        })
    }

    /// Append one normal reading. Legal in every state.
    pub fn generate_normal_sample(&mut self) {
        self.telemetry.append_normal(&mut self.source);
    }

    /// Raise the critical fault: append the temperature spike and the
    /// critical marker, then the agent narration as one batch.
    ///
    /// Every call appends another spike. The marker is deduplicated by the
    /// dialogue log and the narration is only written on the first raise.
    pub fn trigger_fault(&mut self) {
        let newly_raised = self.fault.raise();

        self.telemetry.append_fault_burst();
        let marker_added = self
            .dialogue
            .append(narration::critical_event(self.detector.threshold_c()));

        if !newly_raised {
            debug!(marker_added, "fault already raised, spike appended");
            return;
        }

        self.critical_reading_c = self.detector.first_critical(self.telemetry.iter());

        self.dialogue.append(narration::ANALYSIS_STARTED);
        self.dialogue.append(narration::ANOMALY_DETECTED);
        self.dialogue.append(narration::DELEGATED_TO_VOICE_AGENT);

        info!(
            critical_reading_c = ?self.critical_reading_c,
            "critical fault raised, delegating to voice agent"
        );
    }

    /// Book the first free bay on the customer's behalf, passing through
    /// `AwaitingBookingDecision` on the way to `Booked`.
    ///
    /// Fails with [`EngineError::PreconditionFailed`] unless a fault is
    /// active and nothing is booked yet, and with [`EngineError::NoFreeBay`]
    /// when every bay is taken. Nothing is mutated on failure.
    pub fn accept_booking(&mut self) -> Result<usize, EngineError> {
        if !self.fault.is_triggered() {
            warn!("booking rejected: no fault has been raised");
            return Err(EngineError::PreconditionFailed {
                reason: "no fault has been raised",
            });
        }

        if let Some(bay) = self.booking.bay() {
            warn!(bay, "booking rejected: service already booked");
            return Err(EngineError::PreconditionFailed {
                reason: "service already booked",
            });
        }

        debug!(state = ?EngineState::AwaitingBookingDecision, "customer accepted booking");

        let bay = self.bays.allocate_first_free().map_err(|e| {
            warn!(error = %e, "booking failed");
            EngineError::from(e)
        })?;

        self.booking.bay = Some(bay);
        self.dialogue.append(narration::booking_accepted(bay));

        info!(bay, "service bay booked");
        Ok(bay)
    }

    /// Start a new session from the configured initial state.
    pub fn reset(&mut self) {
        self.telemetry = TelemetryBuffer::seeded(
            self.config.capacity,
            self.config.initial_samples,
            &mut self.source,
        );
        self.fault = FaultEvent::default();
        self.critical_reading_c = None;
        self.dialogue = DialogueLog::new();
        self.bays = self.initial_bays.clone();
        self.booking = ServiceBooking::default();

        info!("simulation reset");
    }

    pub fn apply(&mut self, action: Action) -> Result<Outcome, EngineError> {
        match action {
            Action::GenerateSample => {
                self.generate_normal_sample();
                Ok(Outcome::SampleAppended {
                    latest_c: self.telemetry.latest(),
                })
            }
            Action::TriggerFault => {
                self.trigger_fault();
                Ok(Outcome::FaultRaised)
            }
            Action::AcceptBooking => self.accept_booking().map(|bay| Outcome::Booked { bay }),
            Action::Reset => {
                self.reset();
                Ok(Outcome::Reset)
            }
        }
    }

    pub fn state(&self) -> EngineState {
        if self.booking.is_booked() {
            EngineState::Booked
        } else if self.fault.is_triggered() {
            EngineState::FaultDetected
        } else {
            EngineState::Monitoring
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            samples: self.telemetry.snapshot(),
            fault_triggered: self.fault.is_triggered(),
            service_booked: self.booking.is_booked(),
            booked_bay: self.booking.bay(),
            bays: self.bays.status(),
            dialogue: self.dialogue.entries().to_vec(),
        }
    }

    pub fn view(&self) -> ViewModel {
        let fault_triggered = self.fault.is_triggered();
        let service_booked = self.booking.is_booked();

        ViewModel {
            status_banner: (!fault_triggered).then_some(STATUS_NORMAL),
            show_voice_agent: fault_triggered,
            voice_agent_script: fault_triggered.then_some(VOICE_AGENT_SCRIPT),
            show_booking_button: fault_triggered && !service_booked,
            show_confirmation: service_booked,
            confirmation: service_booked.then_some(APPOINTMENT_CONFIRMED),
            report: self.report(),
            critical_reading_c: self.critical_reading_c,
        }
    }

    pub fn report(&self) -> Option<RootCauseReport> {
        self.booking
            .is_booked()
            .then(RootCauseReport::coolant_temperature_sensor)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &TelemetryBuffer {
        &self.telemetry
    }

    pub fn dialogue(&self) -> &DialogueLog {
        &self.dialogue
    }

    pub fn bays(&self) -> &BayAllocator {
        &self.bays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::FAULT_BURST_C;

    struct Ramp(f64);

    impl TemperatureSource for Ramp {
        fn next_sample(&mut self) -> f64 {
            self.0 += 1.0;
            self.0
        }
    }

    fn ramp_engine(config: EngineConfig) -> SimulationEngine<Ramp> {
        SimulationEngine::with_source(config, Ramp(0.0)).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let engine = ramp_engine(EngineConfig::default());
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.state, EngineState::Monitoring);
        assert_eq!(snapshot.samples.len(), 20);
        assert_eq!(snapshot.samples[0], 1.0);
        assert!(!snapshot.fault_triggered);
        assert!(!snapshot.service_booked);
        assert!(snapshot.dialogue.is_empty());
        assert_eq!(engine.report(), None);
    }

    #[test]
    fn test_generate_sample_uses_injected_source() {
        let mut engine = ramp_engine(EngineConfig::default());
        engine.generate_normal_sample();
        assert_eq!(engine.telemetry().latest(), Some(21.0));
    }

    #[test]
    fn test_second_trigger_appends_spike_only() {
        let mut engine = ramp_engine(EngineConfig::default());
        engine.trigger_fault();
        engine.trigger_fault();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.samples.len(), 28);
        assert_eq!(&snapshot.samples[20..24], &FAULT_BURST_C);
        assert_eq!(&snapshot.samples[24..], &FAULT_BURST_C);
        assert_eq!(snapshot.dialogue.len(), 4);
        assert_eq!(snapshot.state, EngineState::FaultDetected);
    }

    #[test]
    fn test_critical_reading_survives_window_scroll() {
        let mut engine = ramp_engine(EngineConfig::default());
        engine.trigger_fault();
        for _ in 0..31 {
            engine.generate_normal_sample();
        }

        let view = engine.view();
        assert!(view.show_voice_agent);
        assert!(!engine.telemetry().iter().any(|t| t >= 120.0));
        assert_eq!(view.critical_reading_c, Some(125.0));

        engine.reset();
        assert_eq!(engine.view().critical_reading_c, None);
    }

    #[test]
    fn test_booking_passes_through_awaiting_decision() {
        let mut engine = ramp_engine(EngineConfig::default());
        engine.trigger_fault();
        assert_ne!(engine.state(), EngineState::AwaitingBookingDecision);
        engine.accept_booking().unwrap();
        assert_eq!(engine.state(), EngineState::Booked);
    }

    #[test]
    fn test_with_rng_rejects_negative_stddev() {
        let config = EngineConfig {
            stddev_c: -2.0,
            ..EngineConfig::default()
        };
        let result = SimulationEngine::with_rng(config, StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ConfigError::InvalidDistribution { .. })));
    }

    #[test]
    fn test_state_progression() {
        let mut engine = ramp_engine(EngineConfig::default());
        assert_eq!(engine.state(), EngineState::Monitoring);
        engine.trigger_fault();
        assert_eq!(engine.state(), EngineState::FaultDetected);
        engine.accept_booking().unwrap();
        assert_eq!(engine.state(), EngineState::Booked);
        engine.generate_normal_sample();
        assert_eq!(engine.state(), EngineState::Booked);
    }

    #[test]
    fn test_second_booking_rejected() {
        let mut engine = ramp_engine(EngineConfig::default());
        engine.trigger_fault();
        assert_eq!(engine.accept_booking(), Ok(1));
        assert_eq!(
            engine.accept_booking(),
            Err(EngineError::PreconditionFailed {
                reason: "service already booked"
            })
        );
        assert_eq!(engine.snapshot().booked_bay, Some(1));
    }

    #[test]
    fn test_apply_dispatch() {
        let mut engine = ramp_engine(EngineConfig::default());
        assert_eq!(
            engine.apply(Action::GenerateSample),
            Ok(Outcome::SampleAppended { latest_c: Some(21.0) })
        );
        assert_eq!(engine.apply(Action::TriggerFault), Ok(Outcome::FaultRaised));
        assert_eq!(engine.apply(Action::AcceptBooking), Ok(Outcome::Booked { bay: 1 }));
        assert_eq!(engine.apply(Action::Reset), Ok(Outcome::Reset));
        assert_eq!(engine.state(), EngineState::Monitoring);
    }

    #[test]
    fn test_critical_reading_comes_from_burst() {
        let mut engine = ramp_engine(EngineConfig::default());
        assert_eq!(engine.view().critical_reading_c, None);
        engine.trigger_fault();
        assert_eq!(engine.view().critical_reading_c, Some(125.0));
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("sample".parse::<Action>(), Ok(Action::GenerateSample));
        assert_eq!(" Fault ".parse::<Action>(), Ok(Action::TriggerFault));
        assert_eq!("accept".parse::<Action>(), Ok(Action::AcceptBooking));
        assert_eq!("reset".parse::<Action>(), Ok(Action::Reset));
        assert_eq!(
            "launch".parse::<Action>(),
            Err(ParseActionError("launch".to_string()))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            SimulationEngine::with_source(config, Ramp(0.0)),
            Err(ConfigError::ZeroCapacity)
        ));
    }
}
