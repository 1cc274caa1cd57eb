//! Zone and motor control primitives for ductzone.
//!
//! A ducted system has one shared air-handling unit (the *motor*) and any
//! number of *zones*, each with its own temperature sensor and a vent switch
//! on its duct branch. This crate holds the deterministic control rules that
//! sit between them; it performs no I/O of its own.
//!
//! # Architecture
//!
//! - [`ZoneController`] decides open/closed for one vent using a hysteresis
//!   band around the target and a minimum dwell time between transitions
//! - [`MotorCoordinator`] folds the open zones into a single
//!   [`MotorCommand`] (mode priority + setpoint selection) and is the only
//!   writer of motor commands
//! - [`StatusProjector`] derives a read-only [`CoordinatorSnapshot`]
//! - [`Restorable`] is the snapshot/restore contract that lets dwell-time
//!   bookkeeping survive restarts
//! - [`ports`] declares the capability traits the host binds to real
//!   sensors, switches, the motor entity and persistence
//!
//! # Data flow
//!
//! ```text
//! sensor/mode/target event ─▶ ZoneController ─(vent flip)─▶ MotorCoordinator ─▶ MotorCommand
//!                                                                   │
//!                                                                   ▼
//!                                                          StatusProjector
//! ```

pub mod dwell;
pub mod error;
pub mod hysteresis;
pub mod mode;
pub mod motor;
pub mod ports;
pub mod restore;
pub mod settings;
pub mod status;
pub mod vent;
pub mod zone;

pub use dwell::DwellTimer;
pub use error::{ControlError, ControlResult};
pub use hysteresis::decide_vent;
pub use mode::{HvacAction, HvacMode, MotorMode};
pub use motor::{MotorCommand, MotorCoordinator, MotorUpdate};
pub use ports::{MotorActuator, VentActuator, ZoneStateStore};
pub use restore::{CoordinatorMemory, Restorable, ZoneSnapshot};
pub use settings::GlobalSettings;
pub use status::{CoordinatorSnapshot, StatusProjector};
pub use vent::{VentState, VentTransition};
pub use zone::{ZoneController, ZoneEvent, ZoneOutcome, ZoneSpec, ZoneStatus};
