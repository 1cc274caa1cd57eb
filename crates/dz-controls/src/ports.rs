//! Capability ports between the control core and the outside world.
//!
//! ```text
//!   host adapter ──▶ port trait ──▶ HvacRuntime (core)
//! ```
//!
//! Actuation ports are fire-and-forget: the core treats a command as applied
//! once the call returns. Retrying or surfacing a rejected command is the
//! adapter's job.

use dz_core::ZoneId;

use crate::error::ControlResult;
use crate::mode::MotorMode;
use crate::restore::{CoordinatorMemory, ZoneSnapshot};
use crate::vent::VentState;

// ───────────────────────────────────────────────────────────────
// Vent switches (core → zone dampers)
// ───────────────────────────────────────────────────────────────

/// Opens and closes the vent of a zone.
pub trait VentActuator {
    fn set_vent(&mut self, zone: &ZoneId, state: VentState);
}

// ───────────────────────────────────────────────────────────────
// Motor (core → shared air-handling unit)
// ───────────────────────────────────────────────────────────────

/// Commands the shared motor.
pub trait MotorActuator {
    /// Run in `mode`. `setpoint` is absent for `dry` and `fan_only`.
    fn set_motor(&mut self, mode: MotorMode, setpoint: Option<f64>);

    fn set_motor_off(&mut self);

    /// Forward a fan mode. Only called while the motor runs.
    fn set_fan_mode(&mut self, fan_mode: &str);
}

// ───────────────────────────────────────────────────────────────
// Persistence (core ↔ durable storage)
// ───────────────────────────────────────────────────────────────

/// Durable storage for state that must survive restarts.
///
/// Zone snapshots are saved on every vent transition and every accepted
/// user selection, and loaded once per zone at start-up.
pub trait ZoneStateStore {
    /// Last saved snapshot of `zone`, `None` on first run.
    fn load_zone_state(&self, zone: &ZoneId) -> Option<ZoneSnapshot>;

    /// # Errors
    ///
    /// Returns [`ControlError::Persistence`](crate::ControlError::Persistence)
    /// when the backend cannot write. The in-memory state stays authoritative.
    fn save_zone_state(&mut self, zone: &ZoneId, snapshot: &ZoneSnapshot) -> ControlResult<()>;

    /// Last saved coordinator memory. Stores that do not keep it return `None`.
    fn load_coordinator_memory(&self) -> Option<CoordinatorMemory> {
        None
    }

    fn save_coordinator_memory(&mut self, _memory: &CoordinatorMemory) -> ControlResult<()> {
        Ok(())
    }
}
