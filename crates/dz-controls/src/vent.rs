//! Vent (damper switch) state.
//!
//! A vent is a two-state actuator: commands are fire-and-forget and the
//! controller treats a command as applied as soon as it is issued.

use core::fmt;

use dz_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Position of a zone's vent switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VentState {
    Open,
    #[default]
    Closed,
}

impl VentState {
    pub fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for VentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// A vent flip that was actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VentTransition {
    pub from: VentState,
    pub to: VentState,
    pub at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_closed() {
        assert_eq!(VentState::default(), VentState::Closed);
        assert!(!VentState::default().is_open());
    }

    #[test]
    fn from_open_and_display() {
        assert_eq!(VentState::from_open(true), VentState::Open);
        assert_eq!(VentState::Closed.to_string(), "closed");
    }
}
