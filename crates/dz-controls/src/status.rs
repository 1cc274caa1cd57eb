//! Read-only summary of the whole system.

use serde::{Deserialize, Serialize};

use crate::mode::MotorMode;
use crate::motor::{MotorCommand, MotorCoordinator};
use crate::zone::ZoneController;

/// Externally visible summary. Purely derived, never mutated on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub open_count: usize,
    pub total_count: usize,
    /// Mode the motor runs in, `None` when it is off.
    pub active_mode: Option<MotorMode>,
    /// Motor setpoint, `None` when off or in a mode without one.
    pub motor_target: Option<f64>,
    /// Open zone names in configuration order.
    pub open_zones: Vec<String>,
    /// Closed zone names in configuration order.
    pub closed_zones: Vec<String>,
}

impl CoordinatorSnapshot {
    /// Short `"open/total"` label, e.g. `"2/3"`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.open_count, self.total_count)
    }

    pub fn is_running(&self) -> bool {
        self.active_mode.is_some()
    }
}

/// Derives [`CoordinatorSnapshot`]s. Holds no state.
pub struct StatusProjector;

impl StatusProjector {
    /// Project the current zone set and the last emitted motor command.
    ///
    /// Before the coordinator's first sync the command the zones would call
    /// for is reported instead.
    pub fn project(zones: &[ZoneController], coordinator: &MotorCoordinator) -> CoordinatorSnapshot {
        let command = coordinator
            .last_command()
            .unwrap_or_else(|| MotorCoordinator::reconcile(zones));

        let (open, closed): (Vec<&ZoneController>, Vec<&ZoneController>) =
            zones.iter().partition(|z| z.is_open());

        CoordinatorSnapshot {
            open_count: open.len(),
            total_count: zones.len(),
            active_mode: command.mode(),
            motor_target: match command {
                MotorCommand::Off => None,
                MotorCommand::Run { setpoint, .. } => setpoint,
            },
            open_zones: open.iter().map(|z| z.name().to_string()).collect(),
            closed_zones: closed.iter().map(|z| z.name().to_string()).collect(),
        }
    }
}
