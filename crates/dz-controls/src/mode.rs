//! HVAC modes and actions.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Operating mode selected for a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    FanOnly,
    Dry,
}

impl HvacMode {
    /// Every mode, in the default configuration order.
    pub const ALL: [HvacMode; 5] = [
        HvacMode::Off,
        HvacMode::Heat,
        HvacMode::Cool,
        HvacMode::FanOnly,
        HvacMode::Dry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::FanOnly => "fan_only",
            Self::Dry => "dry",
        }
    }

    /// The motor mode this zone asks for while its vent is open.
    pub fn motor_mode(self) -> Option<MotorMode> {
        match self {
            Self::Off => None,
            Self::Heat => Some(MotorMode::Heat),
            Self::Cool => Some(MotorMode::Cool),
            Self::FanOnly => Some(MotorMode::FanOnly),
            Self::Dry => Some(MotorMode::Dry),
        }
    }

    /// Action reported while the vent is open in this mode.
    pub fn open_action(self) -> HvacAction {
        match self {
            Self::Off => HvacAction::Off,
            Self::Heat => HvacAction::Heating,
            Self::Cool => HvacAction::Cooling,
            Self::FanOnly => HvacAction::Fan,
            Self::Dry => HvacAction::Drying,
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HvacMode {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ControlError::UnknownMode {
                value: s.to_string(),
            })
    }
}

/// Mode the shared motor can be commanded into.
///
/// Declaration order is priority order: when several open zones disagree,
/// the earliest variant present wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorMode {
    Cool,
    Heat,
    Dry,
    FanOnly,
}

impl MotorMode {
    /// Highest priority first.
    pub const PRIORITY: [MotorMode; 4] = [
        MotorMode::Cool,
        MotorMode::Heat,
        MotorMode::Dry,
        MotorMode::FanOnly,
    ];

    pub fn as_str(self) -> &'static str {
        self.hvac_mode().as_str()
    }

    pub fn hvac_mode(self) -> HvacMode {
        match self {
            Self::Cool => HvacMode::Cool,
            Self::Heat => HvacMode::Heat,
            Self::Dry => HvacMode::Dry,
            Self::FanOnly => HvacMode::FanOnly,
        }
    }
}

impl fmt::Display for MotorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a zone is currently doing, derived from mode and vent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacAction {
    Off,
    Idle,
    Heating,
    Cooling,
    Fan,
    Drying,
}
