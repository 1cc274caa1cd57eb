//! Actuators that record every command instead of driving hardware.
//!
//! Used for scenario replay, dry runs and tests.

use dz_controls::{MotorActuator, MotorMode, VentActuator, VentState};
use dz_core::ZoneId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentCommand {
    pub zone: ZoneId,
    pub state: VentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum MotorCall {
    Run {
        mode: MotorMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        setpoint: Option<f64>,
    },
    Off,
    FanMode {
        fan_mode: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingVents {
    pub commands: Vec<VentCommand>,
}

impl RecordingVents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands sent to one zone, oldest first.
    pub fn for_zone(&self, zone: &ZoneId) -> Vec<VentState> {
        self.commands
            .iter()
            .filter(|c| &c.zone == zone)
            .map(|c| c.state)
            .collect()
    }
}

impl VentActuator for RecordingVents {
    fn set_vent(&mut self, zone: &ZoneId, state: VentState) {
        self.commands.push(VentCommand {
            zone: zone.clone(),
            state,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMotor {
    pub calls: Vec<MotorCall>,
}

impl RecordingMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run/off commands only, fan mode calls filtered out.
    pub fn commands(&self) -> Vec<&MotorCall> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, MotorCall::FanMode { .. }))
            .collect()
    }

    pub fn last_command(&self) -> Option<&MotorCall> {
        self.commands().last().copied()
    }
}

impl MotorActuator for RecordingMotor {
    fn set_motor(&mut self, mode: MotorMode, setpoint: Option<f64>) {
        self.calls.push(MotorCall::Run { mode, setpoint });
    }

    fn set_motor_off(&mut self) {
        self.calls.push(MotorCall::Off);
    }

    fn set_fan_mode(&mut self, fan_mode: &str) {
        self.calls.push(MotorCall::FanMode {
            fan_mode: fan_mode.to_string(),
        });
    }
}
