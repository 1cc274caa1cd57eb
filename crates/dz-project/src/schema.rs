//! Configuration file schema definitions.

use dz_controls::HvacMode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Ducted HVAC";
pub const DEFAULT_MIN_TEMP: f64 = 16.0;
pub const DEFAULT_MAX_TEMP: f64 = 30.0;
pub const DEFAULT_TEMP_STEP: f64 = 0.5;
pub const DEFAULT_TOLERANCE: f64 = 0.3;
pub const DEFAULT_FAN_MODES: [&str; 4] = ["auto", "low", "medium", "high"];

/// One ducted system: a shared motor plus its zones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HvacConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Entity id of the climate device driving the shared motor.
    pub motor: String,
    #[serde(default = "default_modes")]
    pub modes: Vec<HvacMode>,
    #[serde(default = "default_fan_modes")]
    pub fan_modes: Vec<String>,
    #[serde(default = "default_min_temp")]
    pub min_temp: f64,
    #[serde(default = "default_max_temp")]
    pub max_temp: f64,
    #[serde(default = "default_temp_step")]
    pub temp_step: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Seconds between two vent transitions of one zone. 0 disables.
    #[serde(default)]
    pub min_cycle_duration: f64,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneDef {
    pub name: String,
    /// Stable id. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    /// Entity id of the vent switch.
    pub vent: String,
    /// Entity id of the temperature sensor.
    pub sensor: String,
}

impl HvacConfig {
    /// Config with every optional field at its default and no zones.
    pub fn new(motor: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            motor: motor.into(),
            modes: default_modes(),
            fan_modes: default_fan_modes(),
            min_temp: DEFAULT_MIN_TEMP,
            max_temp: DEFAULT_MAX_TEMP,
            temp_step: DEFAULT_TEMP_STEP,
            tolerance: DEFAULT_TOLERANCE,
            min_cycle_duration: 0.0,
            zones: Vec::new(),
        }
    }

    pub fn with_zone(mut self, zone: ZoneDef) -> Self {
        self.zones.push(zone);
        self
    }
}

impl ZoneDef {
    pub fn new(
        name: impl Into<String>,
        vent: impl Into<String>,
        sensor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unique_id: None,
            vent: vent.into(),
            sensor: sensor.into(),
        }
    }
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

fn default_modes() -> Vec<HvacMode> {
    HvacMode::ALL.to_vec()
}

fn default_fan_modes() -> Vec<String> {
    DEFAULT_FAN_MODES.iter().map(|m| m.to_string()).collect()
}

fn default_min_temp() -> f64 {
    DEFAULT_MIN_TEMP
}

fn default_max_temp() -> f64 {
    DEFAULT_MAX_TEMP
}

fn default_temp_step() -> f64 {
    DEFAULT_TEMP_STEP
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
