//! # Automotive Monitoring Workflow Simulator
//!
//! A UI-agnostic simulation engine for a vehicle monitoring pipeline:
//! engine-temperature telemetry, critical-fault detection, scripted agent
//! delegation and service-bay booking.
//!
//! ## Features
//!
//! - **Telemetry window**: bounded FIFO of temperature samples drawn from a
//!   seedable normal distribution
//! - **Fault latch**: a critical fault is raised once per session and drives
//!   every derived view
//! - **Agent dialogue**: append-only narration with a deduplicated critical marker
//! - **Service bays**: fixed bay table with first-free allocation
//! - **Snapshots**: immutable, serializable views for any presentation layer
//!
//! ## Quick Start
//!
//! ```rust
//! use autosim::{EngineConfig, SimulationEngine};
//!
//! let mut engine = SimulationEngine::seeded(EngineConfig::default(), 42).unwrap();
//!
//! engine.generate_normal_sample();
//! engine.trigger_fault();
//!
//! match engine.accept_booking() {
//!     Ok(bay) => println!("Booked bay {}", bay),
//!     Err(e) => println!("Booking failed: {}", e),
//! }
//!
//! let snapshot = engine.snapshot();
//! assert!(snapshot.service_booked);
//! ```
//!
//! ## Architecture
//!
//! - [`engine`] - State machine, snapshot and view model
//! - [`telemetry`] - Sample window and temperature sources
//! - [`fault`] - Fault latch and threshold detector
//! - [`dialogue`] - Agent narration log
//! - [`bays`] - Service bay allocation
//! - [`report`] - Root cause report and agent scripts
//! - [`config`] - Engine configuration

#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

pub mod bays;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod fault;
pub mod report;
pub mod telemetry;

// Re-export main public types for convenience
pub use bays::{BayAllocator, BayError, BayState, BayStatus};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Action, EngineError, EngineState, Outcome, SimulationEngine, Snapshot, ViewModel};
pub use telemetry::{NormalSampler, TelemetryBuffer, TemperatureSource};
