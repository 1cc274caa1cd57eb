//! JSON file state store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dz_controls::{ControlResult, CoordinatorMemory, ZoneSnapshot, ZoneStateStore};
use dz_core::ZoneId;
use tracing::{debug, info};

use crate::types::{STATE_VERSION, StateFile};
use crate::{StateError, StateResult};

/// State kept in a single JSON document, rewritten on every save.
///
/// Writes go to a sibling temp file that is then renamed over the real one,
/// so a crash mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
    state: StateFile,
}

impl JsonStateStore {
    /// Open `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> StateResult<Self> {
        let path = path.into();
        let state = if path.exists() {
            let state = Self::read(&path)?;
            info!(path = %path.display(), zones = state.zones.len(), "loaded state file");
            state
        } else {
            debug!(path = %path.display(), "no state file, starting empty");
            StateFile::default()
        };
        Ok(Self { path, state })
    }

    /// Read a state file without opening it for writing.
    pub fn read(path: &Path) -> StateResult<StateFile> {
        let content = fs::read_to_string(path)?;
        let state: StateFile = serde_json::from_str(&content)?;
        if state.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                version: state.version,
            });
        }
        Ok(state)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &StateFile {
        &self.state
    }

    pub fn generation(&self) -> Option<&str> {
        self.state.generation.as_deref()
    }

    /// Record the configuration generation and write the file.
    pub fn set_generation(&mut self, generation: &str) -> StateResult<()> {
        if self.generation() != Some(generation) {
            if let Some(previous) = &self.state.generation {
                info!(previous = %previous, current = %generation, "configuration generation changed");
            }
            self.state.generation = Some(generation.to_string());
        }
        self.flush()
    }

    /// Write the current state to disk.
    pub fn flush(&mut self) -> StateResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StateError::InvalidPath {
                message: format!("{} has no file name", self.path.display()),
            })?;

        self.state.saved_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&self.state)?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), "state file written");
        Ok(())
    }
}

impl ZoneStateStore for JsonStateStore {
    fn load_zone_state(&self, zone: &ZoneId) -> Option<ZoneSnapshot> {
        self.state.zones.get(zone.as_str()).cloned()
    }

    fn save_zone_state(&mut self, zone: &ZoneId, snapshot: &ZoneSnapshot) -> ControlResult<()> {
        self.state
            .zones
            .insert(zone.as_str().to_string(), snapshot.clone());
        Ok(self.flush()?)
    }

    fn load_coordinator_memory(&self) -> Option<CoordinatorMemory> {
        Some(self.state.coordinator.clone())
    }

    fn save_coordinator_memory(&mut self, memory: &CoordinatorMemory) -> ControlResult<()> {
        if self.state.coordinator == *memory {
            return Ok(());
        }
        self.state.coordinator = memory.clone();
        Ok(self.flush()?)
    }
}
