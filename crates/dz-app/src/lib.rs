//! Shared application service layer for ductzone.
//!
//! This crate turns a configuration file into a running [`HvacRuntime`]:
//! config loading and compilation, the event dispatcher that binds the
//! control core to actuator and persistence ports, recording actuators for
//! dry runs, and scenario replay.

pub mod compile;
pub mod error;
pub mod events;
pub mod project_service;
pub mod recording;
pub mod replay;
pub mod runtime;

// Re-export key types for convenience
pub use compile::{CompiledConfig, compile_config};
pub use error::{AppError, AppResult};
pub use events::{Dispatch, DispatchReport, RuntimeEvent, ZoneTransition};
pub use project_service::{ZoneSummary, list_zones, load_config, save_config, validate_config};
pub use recording::{MotorCall, RecordingMotor, RecordingVents, VentCommand};
pub use replay::{ReplayEntry, ReplayReport, Scenario, ScenarioStep, load_scenario, parse_scenario, replay};
pub use runtime::{HvacRuntime, StatusListener};
