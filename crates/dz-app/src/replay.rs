//! Scenario replay: drive a runtime from a scripted event list.
//!
//! A scenario is a YAML document of timestamped events:
//!
//! ```yaml
//! start: 2026-01-05T08:00:00Z   # optional, defaults to the Unix epoch
//! events:
//!   - { at_s: 0,   kind: mode,        zone: living_room, mode: cool }
//!   - { at_s: 0,   kind: target,      zone: living_room, value: 23.0 }
//!   - { at_s: 30,  kind: temperature, zone: living_room, value: 24.6 }
//!   - { at_s: 600, kind: tick }
//! ```
//!
//! Between two events the replay fires the ticks a host scheduler would
//! have fired at [`HvacRuntime::next_recheck_at`].

use std::path::Path;

use dz_controls::{CoordinatorSnapshot, ZoneStateStore, ZoneStatus};
use dz_core::{Timestamp, add_saturating, elapsed_seconds, seconds_to_delta};
use dz_project::HvacConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::events::{Dispatch, DispatchReport, RuntimeEvent, ZoneTransition};
use crate::recording::{MotorCall, RecordingMotor, RecordingVents, VentCommand};
use crate::runtime::HvacRuntime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default)]
    pub events: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Seconds since the scenario start.
    pub at_s: f64,
    #[serde(flatten)]
    pub event: RuntimeEvent,
}

/// One line of the replay log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub at_s: f64,
    /// `None` for ticks inserted by the replay's scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<RuntimeEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<ZoneTransition>,
    /// Motor command sent after the step, if it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub log: Vec<ReplayEntry>,
    pub vent_commands: Vec<VentCommand>,
    pub motor_calls: Vec<MotorCall>,
    pub snapshot: CoordinatorSnapshot,
    pub zones: Vec<ZoneStatus>,
}

/// Load a scenario file.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}

pub fn parse_scenario(content: &str) -> AppResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(content).map_err(|e| AppError::Scenario {
        message: format!("failed to parse scenario: {e}"),
    })?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    let mut previous = 0.0_f64;
    for (index, step) in scenario.events.iter().enumerate() {
        if !step.at_s.is_finite() || step.at_s < previous {
            return Err(AppError::Scenario {
                message: format!(
                    "events[{index}].at_s = {} must be finite and not earlier than {previous}",
                    step.at_s
                ),
            });
        }
        previous = step.at_s;
    }
    Ok(())
}

/// Replay `scenario` against `config` with recording actuators.
///
/// `store` seeds the start-up state and receives every save, so replaying
/// twice against the same JSON store continues where the first run ended.
/// Returns the report and the store.
pub fn replay<S: ZoneStateStore>(
    config: &HvacConfig,
    scenario: &Scenario,
    store: S,
) -> AppResult<(ReplayReport, S)> {
    validate_scenario(scenario)?;
    let start = scenario.start.unwrap_or_default();
    let mut runtime = HvacRuntime::from_config(
        config,
        RecordingVents::new(),
        RecordingMotor::new(),
        store,
        start,
    )?;

    let mut log = Vec::new();
    for step in &scenario.events {
        let at = add_saturating(start, seconds_to_delta(step.at_s));
        run_scheduled_ticks(&mut runtime, start, at, &mut log);

        let entry = match runtime.dispatch(step.event.clone(), at) {
            Dispatch::Applied(report) => entry_for(step.at_s, Some(step.event.clone()), &report),
            Dispatch::Ignored { reason } => ReplayEntry {
                at_s: step.at_s,
                event: Some(step.event.clone()),
                ignored: Some(reason),
                transitions: Vec::new(),
                motor: None,
            },
        };
        log.push(entry);
    }

    let snapshot = runtime.snapshot();
    let zones = runtime.zone_statuses();
    let (vents, motor, store) = runtime.into_parts();
    Ok((
        ReplayReport {
            log,
            vent_commands: vents.commands,
            motor_calls: motor.calls,
            snapshot,
            zones,
        },
        store,
    ))
}

/// Fire every tick that falls due up to and including `until`.
fn run_scheduled_ticks<S: ZoneStateStore>(
    runtime: &mut HvacRuntime<RecordingVents, RecordingMotor, S>,
    start: Timestamp,
    until: Timestamp,
    log: &mut Vec<ReplayEntry>,
) {
    // Each tick at a due instant clears that instant; the bound only guards
    // against a zone that keeps reporting the same instant.
    for _ in 0..=runtime.zones().len() {
        let Some(due) = runtime.next_recheck_at() else {
            return;
        };
        if due > until {
            return;
        }
        debug!(%due, "scheduled recheck");
        let report = runtime.tick(due);
        if !report.is_quiet() {
            log.push(entry_for(elapsed_seconds(start, due), None, &report));
        }
    }
}

fn entry_for(at_s: f64, event: Option<RuntimeEvent>, report: &DispatchReport) -> ReplayEntry {
    ReplayEntry {
        at_s,
        event,
        ignored: None,
        transitions: report.transitions.clone(),
        motor: report.motor.command.map(|c| match c.mode() {
            Some(mode) => match c.setpoint() {
                Some(setpoint) => format!("motor {mode} @ {setpoint}"),
                None => format!("motor {mode}"),
            },
            None => "motor off".to_string(),
        }),
    }
}
