//! Inputs and outcomes of the runtime.

use dz_controls::{MotorUpdate, VentTransition};
use dz_core::ZoneId;
use serde::{Deserialize, Serialize};

/// Discrete input delivered to the runtime.
///
/// Mode and fan mode arrive as raw strings, the way a UI or automation
/// sends them; unrecognized values are ignored rather than rejected upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuntimeEvent {
    /// New sensor reading.
    Temperature { zone: ZoneId, value: f64 },
    /// User selected a mode.
    Mode { zone: ZoneId, mode: String },
    /// User selected a target temperature.
    Target { zone: ZoneId, value: f64 },
    /// User selected a fan mode.
    FanMode { zone: ZoneId, fan_mode: String },
    TurnOn { zone: ZoneId },
    TurnOff { zone: ZoneId },
    /// Retry changes held back by the dwell window.
    Tick,
}

impl RuntimeEvent {
    /// Zone the event is addressed to, `None` for ticks.
    pub fn zone(&self) -> Option<&ZoneId> {
        match self {
            Self::Temperature { zone, .. }
            | Self::Mode { zone, .. }
            | Self::Target { zone, .. }
            | Self::FanMode { zone, .. }
            | Self::TurnOn { zone }
            | Self::TurnOff { zone } => Some(zone),
            Self::Tick => None,
        }
    }
}

/// A vent flip applied to one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTransition {
    pub zone: ZoneId,
    #[serde(flatten)]
    pub transition: VentTransition,
}

/// What processing one event (or one batch) did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Vent flips, in the order they were sent to the vent actuator.
    pub transitions: Vec<ZoneTransition>,
    /// Zones whose change is held back by the dwell window.
    pub deferred: Vec<ZoneId>,
    /// Reasons for events of a batch that were ignored.
    pub ignored: Vec<String>,
    /// Motor command and fan mode sent after the evaluation.
    pub motor: MotorUpdate,
}

impl DispatchReport {
    pub fn is_quiet(&self) -> bool {
        self.transitions.is_empty() && self.motor.is_empty()
    }
}

/// Outcome of a single event.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Applied(DispatchReport),
    /// The event was invalid; nothing changed.
    Ignored { reason: String },
}

impl Dispatch {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }

    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Ignored { .. } => None,
        }
    }
}
