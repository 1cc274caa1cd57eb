//! Motor coordinator: one command for the shared air-handling unit.
//!
//! The coordinator is the only writer of motor commands. It owns no zone
//! state; every reconciliation reads the current zone set.
//!
//! Reconciliation:
//! 1. Active zones are the ones with an open vent
//! 2. No active zone: the motor is turned off
//! 3. Winning mode = highest priority mode among active zones
//!    (`cool > heat > dry > fan_only`); lower priority zones stay open but do
//!    not influence the motor
//! 4. `cool`: setpoint = lowest target among active cool zones
//! 5. `heat`: setpoint = highest target among active heat zones
//! 6. `dry` / `fan_only`: no setpoint
//! 7. A command is emitted only when it differs from the last one

use dz_core::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mode::{HvacMode, MotorMode};
use crate::restore::{CoordinatorMemory, Restorable};
use crate::zone::ZoneController;

/// Instruction for the shared motor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MotorCommand {
    Off,
    Run {
        mode: MotorMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        setpoint: Option<f64>,
    },
}

impl MotorCommand {
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    pub fn mode(&self) -> Option<MotorMode> {
        match self {
            Self::Off => None,
            Self::Run { mode, .. } => Some(*mode),
        }
    }

    pub fn setpoint(&self) -> Option<f64> {
        match self {
            Self::Off => None,
            Self::Run { setpoint, .. } => *setpoint,
        }
    }
}

/// What the motor actuator must be told after a sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotorUpdate {
    /// New command, if it changed.
    pub command: Option<MotorCommand>,
    /// Fan mode to forward, if it needs (re)applying.
    pub fan_mode: Option<String>,
}

impl MotorUpdate {
    pub fn is_empty(&self) -> bool {
        self.command.is_none() && self.fan_mode.is_none()
    }
}

/// Single-owner reconciliation of zone demands into motor commands.
#[derive(Debug, Clone, Default)]
pub struct MotorCoordinator {
    last_command: Option<MotorCommand>,
    fan_mode: Option<String>,
    applied_fan_mode: Option<String>,
}

impl MotorCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last command emitted, `None` before the first sync.
    pub fn last_command(&self) -> Option<MotorCommand> {
        self.last_command
    }

    /// Most recently selected fan mode (last-set wins across zones).
    pub fn fan_mode(&self) -> Option<&str> {
        self.fan_mode.as_deref()
    }

    /// Record a fan mode selection; it is forwarded on the next sync.
    pub fn note_fan_mode(&mut self, fan_mode: &str) {
        self.fan_mode = Some(fan_mode.to_string());
    }

    /// Compute the command the zone set calls for. Pure.
    pub fn reconcile(zones: &[ZoneController]) -> MotorCommand {
        let active: Vec<&ZoneController> = zones.iter().filter(|z| z.is_open()).collect();
        if active.is_empty() {
            return MotorCommand::Off;
        }

        // An open vent whose zone has no motor mode (only possible right after
        // a restore, before the dwell window lets it close) still needs air.
        let mode = MotorMode::PRIORITY
            .into_iter()
            .find(|m| active.iter().any(|z| z.mode().motor_mode() == Some(*m)))
            .unwrap_or(MotorMode::FanOnly);

        let setpoint = match mode {
            MotorMode::Cool => active
                .iter()
                .filter(|z| z.mode() == HvacMode::Cool)
                .map(|z| z.target())
                .reduce(f64::min),
            MotorMode::Heat => active
                .iter()
                .filter(|z| z.mode() == HvacMode::Heat)
                .map(|z| z.target())
                .reduce(f64::max),
            MotorMode::Dry | MotorMode::FanOnly => None,
        };

        MotorCommand::Run { mode, setpoint }
    }

    /// Reconcile and report only what changed since the last sync.
    pub fn sync(&mut self, zones: &[ZoneController]) -> MotorUpdate {
        let command = Self::reconcile(zones);
        let changed = self.last_command != Some(command);

        let mut update = MotorUpdate::default();
        if changed {
            info!(?command, "motor command");
            self.last_command = Some(command);
            update.command = Some(command);
        } else {
            debug!(?command, "motor command unchanged");
        }

        if command.is_off() {
            self.applied_fan_mode = None;
        } else if let Some(fan_mode) = &self.fan_mode {
            if changed || self.applied_fan_mode.as_ref() != Some(fan_mode) {
                self.applied_fan_mode = Some(fan_mode.clone());
                update.fan_mode = Some(fan_mode.clone());
            }
        }

        update
    }
}

impl Restorable for MotorCoordinator {
    type Snapshot = CoordinatorMemory;

    fn snapshot(&self) -> CoordinatorMemory {
        CoordinatorMemory {
            fan_mode: self.fan_mode.clone(),
        }
    }

    /// Restore the fan mode selection. The last command is cleared so the
    /// first sync after a restart always re-asserts the motor state.
    fn restore(&mut self, snapshot: CoordinatorMemory, _now: Timestamp) {
        self.fan_mode = snapshot.fan_mode;
        self.applied_fan_mode = None;
        self.last_command = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::restore::ZoneSnapshot;
    use crate::settings::GlobalSettings;
    use crate::vent::VentState;
    use crate::zone::ZoneSpec;
    use chrono::DateTime;

    fn t(secs: i64) -> Timestamp {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn zone(name: &str, mode: HvacMode, target: f64, vent: VentState) -> ZoneController {
        let settings = Arc::new(
            GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.5, &HvacMode::ALL).unwrap(),
        );
        let mut z = ZoneController::new(
            ZoneSpec::new(name, format!("switch.{name}"), format!("sensor.{name}")),
            settings,
            t(0),
        );
        z.restore(
            ZoneSnapshot {
                vent,
                last_transition: t(0),
                mode: Some(mode),
                target: Some(target),
                fan_mode: None,
            },
            t(0),
        );
        z
    }

    use HvacMode::{Cool, Dry, FanOnly, Heat, Off};
    use VentState::{Closed, Open};

    #[test]
    fn all_closed_is_off() {
        let zones = vec![zone("a", Cool, 22.0, Closed), zone("b", Heat, 20.0, Closed)];
        assert_eq!(MotorCoordinator::reconcile(&zones), MotorCommand::Off);
        assert_eq!(MotorCoordinator::reconcile(&[]), MotorCommand::Off);
    }

    #[test]
    fn cool_beats_heat() {
        let zones = vec![zone("a", Heat, 22.0, Open), zone("b", Cool, 24.0, Open)];
        assert_eq!(
            MotorCoordinator::reconcile(&zones),
            MotorCommand::Run {
                mode: MotorMode::Cool,
                setpoint: Some(24.0)
            }
        );
    }

    #[test]
    fn cool_uses_minimum_target() {
        let zones = vec![
            zone("a", Cool, 21.0, Open),
            zone("b", Cool, 23.0, Open),
            zone("c", Cool, 22.0, Open),
        ];
        assert_eq!(MotorCoordinator::reconcile(&zones).setpoint(), Some(21.0));
    }

    #[test]
    fn heat_uses_maximum_target() {
        let zones = vec![
            zone("a", Heat, 19.0, Open),
            zone("b", Heat, 21.0, Open),
            zone("c", Heat, 20.0, Open),
        ];
        let cmd = MotorCoordinator::reconcile(&zones);
        assert_eq!(cmd.mode(), Some(MotorMode::Heat));
        assert_eq!(cmd.setpoint(), Some(21.0));
    }

    #[test]
    fn closed_zones_do_not_vote() {
        let zones = vec![
            zone("a", Cool, 18.0, Closed),
            zone("b", Heat, 21.0, Open),
            zone("c", Heat, 26.0, Closed),
        ];
        assert_eq!(
            MotorCoordinator::reconcile(&zones),
            MotorCommand::Run {
                mode: MotorMode::Heat,
                setpoint: Some(21.0)
            }
        );
    }

    #[test]
    fn dry_and_fan_have_no_setpoint() {
        let zones = vec![zone("a", FanOnly, 22.0, Open), zone("b", Dry, 22.0, Open)];
        assert_eq!(
            MotorCoordinator::reconcile(&zones),
            MotorCommand::Run {
                mode: MotorMode::Dry,
                setpoint: None
            }
        );
        let zones = vec![zone("a", FanOnly, 22.0, Open)];
        assert_eq!(
            MotorCoordinator::reconcile(&zones).mode(),
            Some(MotorMode::FanOnly)
        );
    }

    #[test]
    fn open_zone_in_off_mode_falls_back_to_fan() {
        let zones = vec![zone("a", Off, 22.0, Open)];
        assert_eq!(
            MotorCoordinator::reconcile(&zones),
            MotorCommand::Run {
                mode: MotorMode::FanOnly,
                setpoint: None
            }
        );
    }

    #[test]
    fn sync_suppresses_duplicates() {
        let mut coord = MotorCoordinator::new();
        let zones = vec![zone("a", Cool, 22.0, Closed)];

        let first = coord.sync(&zones);
        assert_eq!(first.command, Some(MotorCommand::Off));
        let second = coord.sync(&zones);
        assert!(second.is_empty());
        assert_eq!(coord.last_command(), Some(MotorCommand::Off));
    }

    #[test]
    fn fan_mode_forwarded_when_running() {
        let mut coord = MotorCoordinator::new();
        coord.note_fan_mode("high");

        // Off: nothing to forward
        let update = coord.sync(&[zone("a", Cool, 22.0, Closed)]);
        assert_eq!(update.fan_mode, None);

        let running = vec![zone("a", Cool, 22.0, Open)];
        let update = coord.sync(&running);
        assert!(update.command.is_some());
        assert_eq!(update.fan_mode.as_deref(), Some("high"));

        // Same command, same fan mode: quiet
        assert!(coord.sync(&running).is_empty());

        // Fan mode change alone is forwarded without a new command
        coord.note_fan_mode("low");
        let update = coord.sync(&running);
        assert_eq!(update.command, None);
        assert_eq!(update.fan_mode.as_deref(), Some("low"));
    }

    #[test]
    fn restore_forces_resync() {
        let mut coord = MotorCoordinator::new();
        coord.note_fan_mode("auto");
        let zones = vec![zone("a", Heat, 20.0, Open)];
        coord.sync(&zones);
        let memory = coord.snapshot();

        let mut fresh = MotorCoordinator::new();
        fresh.restore(memory, t(0));
        assert_eq!(fresh.fan_mode(), Some("auto"));
        assert_eq!(fresh.last_command(), None);
        let update = fresh.sync(&zones);
        assert!(update.command.is_some());
        assert_eq!(update.fan_mode.as_deref(), Some("auto"));
    }
}
