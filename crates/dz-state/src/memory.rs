//! In-memory state store for tests, replays and hosts without a disk.

use std::collections::HashMap;

use dz_controls::{ControlError, ControlResult, CoordinatorMemory, ZoneSnapshot, ZoneStateStore};
use dz_core::ZoneId;

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    zones: HashMap<ZoneId, ZoneSnapshot>,
    coordinator: Option<CoordinatorMemory>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every write fails, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a zone snapshot as if an earlier process had saved it.
    pub fn with_zone(mut self, zone: impl Into<ZoneId>, snapshot: ZoneSnapshot) -> Self {
        self.zones.insert(zone.into(), snapshot);
        self
    }

    pub fn with_coordinator(mut self, memory: CoordinatorMemory) -> Self {
        self.coordinator = Some(memory);
        self
    }

    pub fn zone(&self, zone: &ZoneId) -> Option<&ZoneSnapshot> {
        self.zones.get(zone)
    }

    pub fn coordinator(&self) -> Option<&CoordinatorMemory> {
        self.coordinator.as_ref()
    }

    /// Number of successful writes so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    fn check_writable(&self) -> ControlResult<()> {
        if self.fail_writes {
            return Err(ControlError::Persistence {
                what: "memory store is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl ZoneStateStore for MemoryStateStore {
    fn load_zone_state(&self, zone: &ZoneId) -> Option<ZoneSnapshot> {
        self.zones.get(zone).cloned()
    }

    fn save_zone_state(&mut self, zone: &ZoneId, snapshot: &ZoneSnapshot) -> ControlResult<()> {
        self.check_writable()?;
        self.zones.insert(zone.clone(), snapshot.clone());
        self.saves += 1;
        Ok(())
    }

    fn load_coordinator_memory(&self) -> Option<CoordinatorMemory> {
        self.coordinator.clone()
    }

    fn save_coordinator_memory(&mut self, memory: &CoordinatorMemory) -> ControlResult<()> {
        self.check_writable()?;
        self.coordinator = Some(memory.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use dz_controls::VentState;

    #[test]
    fn save_then_load() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let id = ZoneId::new("study");
        let mut store = MemoryStateStore::new();
        assert!(store.load_zone_state(&id).is_none());

        let snap = ZoneSnapshot::vent_only(VentState::Open, at);
        store.save_zone_state(&id, &snap).unwrap();
        assert_eq!(store.load_zone_state(&id), Some(snap));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failing_store_rejects_writes() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut store = MemoryStateStore::failing();
        let err = store
            .save_zone_state(&ZoneId::new("a"), &ZoneSnapshot::vent_only(VentState::Closed, at))
            .unwrap_err();
        assert!(matches!(err, ControlError::Persistence { .. }));
        assert_eq!(store.save_count(), 0);
    }
}
