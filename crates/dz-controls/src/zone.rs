//! Per-zone vent controller.
//!
//! A [`ZoneController`] owns the mutable state of one zone (mode, target,
//! last reading, vent state, dwell timer) and turns discrete input events
//! into at most one vent transition each.
//!
//! Evaluation order for every event:
//! 1. Validate and apply the input (nothing changes if validation fails)
//! 2. Compute the desired vent state with [`decide_vent`]
//! 3. If it differs from the current state but the dwell window has not
//!    elapsed, hold and remember the pending change; it is retried on the
//!    next event or [`ZoneEvent::Recheck`]
//! 4. Otherwise apply the flip and restart the dwell window

use std::sync::Arc;

use dz_core::{Timestamp, ZoneId, ensure_finite};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dwell::DwellTimer;
use crate::error::{ControlError, ControlResult};
use crate::hysteresis::decide_vent;
use crate::mode::{HvacAction, HvacMode};
use crate::restore::{Restorable, ZoneSnapshot};
use crate::settings::GlobalSettings;
use crate::vent::{VentState, VentTransition};

/// Identity and external bindings of a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Stable id (slug of the name unless configured explicitly).
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Entity id of the vent switch.
    pub vent_entity: String,
    /// Entity id of the temperature sensor.
    pub sensor_entity: String,
}

impl ZoneSpec {
    /// Create a spec whose id is the slug of `name`.
    pub fn new(
        name: impl Into<String>,
        vent_entity: impl Into<String>,
        sensor_entity: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: ZoneId::from_name(&name),
            name,
            vent_entity: vent_entity.into(),
            sensor_entity: sensor_entity.into(),
        }
    }

    /// Override the derived id.
    pub fn with_id(mut self, id: impl Into<ZoneId>) -> Self {
        self.id = id.into();
        self
    }
}

/// Input that triggers a zone re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneEvent {
    /// New reading from the zone's sensor. Accepted as-is, no clamping.
    Temperature(f64),
    /// User selected a mode. Discards any pending debounced change.
    Mode(HvacMode),
    /// User selected a target temperature.
    Target(f64),
    /// No new input; retry a change held back by the dwell window.
    Recheck,
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneOutcome {
    /// Vent state after the evaluation.
    pub vent: VentState,
    /// Set only when the vent actually flipped.
    pub transition: Option<VentTransition>,
    /// Desired state held back by the dwell window, if any.
    pub deferred: Option<VentState>,
}

impl ZoneOutcome {
    pub fn changed(&self) -> bool {
        self.transition.is_some()
    }
}

/// Read-only view of a zone for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus {
    pub id: ZoneId,
    pub name: String,
    pub mode: HvacMode,
    pub action: HvacAction,
    pub target: f64,
    pub current: Option<f64>,
    pub vent_open: bool,
    pub vent_entity: String,
    pub sensor_entity: String,
    pub last_transition: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<VentState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_mode: Option<String>,
}

/// Hysteresis + dwell-time state machine for one zone.
#[derive(Debug, Clone)]
pub struct ZoneController {
    spec: ZoneSpec,
    settings: Arc<GlobalSettings>,
    mode: HvacMode,
    target: f64,
    current: Option<f64>,
    vent: VentState,
    dwell: DwellTimer,
    pending: Option<VentState>,
    fan_mode: Option<String>,
}

impl ZoneController {
    /// Create a zone with default state: mode `off`, vent closed, target at
    /// the middle of the configured range, last transition at `now`.
    pub fn new(spec: ZoneSpec, settings: Arc<GlobalSettings>, now: Timestamp) -> Self {
        let target = settings.default_target();
        let dwell = DwellTimer::new(settings.min_cycle(), now);
        let fan_mode = settings.fan_modes.first().cloned();
        Self {
            spec,
            settings,
            mode: HvacMode::Off,
            target,
            current: None,
            vent: VentState::Closed,
            dwell,
            pending: None,
            fan_mode,
        }
    }

    pub fn spec(&self) -> &ZoneSpec {
        &self.spec
    }

    pub fn id(&self) -> &ZoneId {
        &self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn mode(&self) -> HvacMode {
        self.mode
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.current
    }

    pub fn vent(&self) -> VentState {
        self.vent
    }

    pub fn is_open(&self) -> bool {
        self.vent.is_open()
    }

    pub fn last_transition(&self) -> Timestamp {
        self.dwell.last_transition
    }

    /// Change held back by the dwell window, if any.
    pub fn pending(&self) -> Option<VentState> {
        self.pending
    }

    pub fn fan_mode(&self) -> Option<&str> {
        self.fan_mode.as_deref()
    }

    /// Instant at which a pending change becomes eligible, if one is pending.
    pub fn recheck_due_at(&self) -> Option<Timestamp> {
        self.pending.map(|_| self.dwell.ready_at())
    }

    pub fn action(&self) -> HvacAction {
        if self.mode == HvacMode::Off {
            HvacAction::Off
        } else if self.vent.is_open() {
            self.mode.open_action()
        } else {
            HvacAction::Idle
        }
    }

    /// Mode to use for a turn-on request: the current mode unless it is
    /// `off`, otherwise the configuration's preferred mode.
    pub fn preferred_on_mode(&self) -> HvacMode {
        if self.mode != HvacMode::Off {
            self.mode
        } else {
            self.settings.preferred_on_mode()
        }
    }

    /// Apply an input event and re-evaluate the vent.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the zone untouched, for a non-finite
    /// reading, a mode that is not enabled, or a target outside the
    /// configured bounds.
    pub fn evaluate(&mut self, event: ZoneEvent, now: Timestamp) -> ControlResult<ZoneOutcome> {
        match event {
            ZoneEvent::Temperature(value) => {
                let value = ensure_finite(value, "temperature reading")?;
                self.current = Some(value);
            }
            ZoneEvent::Mode(mode) => {
                if !self.settings.allows_mode(mode) {
                    return Err(ControlError::ModeNotEnabled { mode });
                }
                self.mode = mode;
                // A new mode is a fresh decision; whatever was pending was
                // computed for the old one.
                self.pending = None;
            }
            ZoneEvent::Target(value) => {
                self.target = self.settings.normalize_target(value)?;
            }
            ZoneEvent::Recheck => {}
        }
        Ok(self.apply(now))
    }

    /// Retry a pending change. Equivalent to evaluating [`ZoneEvent::Recheck`].
    pub fn recheck(&mut self, now: Timestamp) -> ZoneOutcome {
        self.apply(now)
    }

    /// Select a fan mode. Does not affect the vent.
    pub fn set_fan_mode(&mut self, fan_mode: &str) -> ControlResult<()> {
        if !self.settings.supports_fan_mode(fan_mode) {
            return Err(ControlError::UnknownFanMode {
                value: fan_mode.to_string(),
            });
        }
        self.fan_mode = Some(fan_mode.to_string());
        Ok(())
    }

    pub fn status(&self) -> ZoneStatus {
        ZoneStatus {
            id: self.spec.id.clone(),
            name: self.spec.name.clone(),
            mode: self.mode,
            action: self.action(),
            target: self.target,
            current: self.current,
            vent_open: self.vent.is_open(),
            vent_entity: self.spec.vent_entity.clone(),
            sensor_entity: self.spec.sensor_entity.clone(),
            last_transition: self.dwell.last_transition,
            pending: self.pending,
            fan_mode: self.fan_mode.clone(),
        }
    }

    fn apply(&mut self, now: Timestamp) -> ZoneOutcome {
        let desired = decide_vent(
            self.mode,
            self.target,
            self.current,
            self.settings.tolerance,
            self.vent,
        );

        if desired == self.vent {
            self.pending = None;
            return ZoneOutcome {
                vent: self.vent,
                transition: None,
                deferred: None,
            };
        }

        if !self.dwell.has_elapsed(now) {
            debug!(
                zone = %self.spec.id,
                desired = %desired,
                remaining_s = self.dwell.time_until_ready(now).num_seconds(),
                "min_cycle_duration not elapsed, holding vent"
            );
            self.pending = Some(desired);
            return ZoneOutcome {
                vent: self.vent,
                transition: None,
                deferred: Some(desired),
            };
        }

        let transition = VentTransition {
            from: self.vent,
            to: desired,
            at: now,
        };
        self.vent = desired;
        self.dwell.mark(now);
        self.pending = None;
        info!(
            zone = %self.spec.id,
            mode = %self.mode,
            from = %transition.from,
            to = %transition.to,
            "vent transition"
        );
        ZoneOutcome {
            vent: self.vent,
            transition: Some(transition),
            deferred: None,
        }
    }
}

impl Restorable for ZoneController {
    type Snapshot = ZoneSnapshot;

    fn snapshot(&self) -> ZoneSnapshot {
        ZoneSnapshot {
            vent: self.vent,
            last_transition: self.dwell.last_transition,
            mode: Some(self.mode),
            target: Some(self.target),
            fan_mode: self.fan_mode.clone(),
        }
    }

    /// Seed vent state and dwell timer from `snapshot`.
    ///
    /// A last-transition instant later than `now` (clock stepped back) is
    /// clamped to `now`. Mode, target and fan mode are restored only if they
    /// are still valid under the current settings.
    fn restore(&mut self, snapshot: ZoneSnapshot, now: Timestamp) {
        self.vent = snapshot.vent;
        self.dwell = DwellTimer::new(self.settings.min_cycle(), snapshot.last_transition.min(now));
        self.pending = None;

        if let Some(mode) = snapshot.mode.filter(|m| self.settings.allows_mode(*m)) {
            self.mode = mode;
        }
        if let Some(target) = snapshot
            .target
            .and_then(|t| self.settings.normalize_target(t).ok())
        {
            self.target = target;
        }
        if let Some(fan_mode) = snapshot
            .fan_mode
            .filter(|f| self.settings.supports_fan_mode(f))
        {
            self.fan_mode = Some(fan_mode);
        }
    }
}
