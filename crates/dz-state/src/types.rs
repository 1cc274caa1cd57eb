//! Persisted state document.

use std::collections::BTreeMap;

use dz_controls::{CoordinatorMemory, ZoneSnapshot};
use dz_core::Timestamp;
use serde::{Deserialize, Serialize};

pub const STATE_VERSION: u32 = 1;

/// Everything one state file holds.
///
/// Zones are keyed by zone id, so state survives zones being reordered,
/// added or removed between configuration generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    /// Generation of the configuration the state was last written under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<Timestamp>,
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneSnapshot>,
    #[serde(default)]
    pub coordinator: CoordinatorMemory,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            generation: None,
            saved_at: None,
            zones: BTreeMap::new(),
            coordinator: CoordinatorMemory::default(),
        }
    }
}
