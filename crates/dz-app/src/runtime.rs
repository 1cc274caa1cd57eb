//! Event-driven runtime binding the control core to its ports.
//!
//! The runtime owns every [`ZoneController`] (in configuration order), the
//! single [`MotorCoordinator`] and the three ports. Events are processed to
//! completion one at a time:
//!
//! 1. Route the event to its zone and evaluate it
//! 2. Send any vent flip to the vent actuator and persist the zone
//! 3. Reconcile the motor once and send whatever changed
//! 4. Publish the status snapshot if it changed
//!
//! An invalid event stops at step 1 and leaves everything untouched.
//! Nothing here reads a clock: every entry point takes `now`.

use std::collections::HashMap;
use std::sync::Arc;

use dz_controls::{
    ControlError, ControlResult, CoordinatorSnapshot, GlobalSettings, HvacMode, MotorActuator,
    MotorCommand, MotorCoordinator, MotorUpdate, Restorable, StatusProjector, VentActuator,
    ZoneController, ZoneEvent, ZoneOutcome, ZoneStateStore, ZoneStatus,
};
use dz_core::{Timestamp, ZoneId};
use dz_project::HvacConfig;
use tracing::{debug, info, warn};

use crate::compile::{CompiledConfig, compile_config};
use crate::error::AppResult;
use crate::events::{Dispatch, DispatchReport, RuntimeEvent, ZoneTransition};

/// Receives every changed status snapshot.
pub type StatusListener = Box<dyn FnMut(&CoordinatorSnapshot) + Send>;

pub struct HvacRuntime<V, M, S> {
    name: String,
    motor_entity: String,
    generation: String,
    settings: Arc<GlobalSettings>,
    zones: Vec<ZoneController>,
    index: HashMap<ZoneId, usize>,
    coordinator: MotorCoordinator,
    vents: V,
    motor: M,
    store: S,
    listener: Option<StatusListener>,
    last_published: Option<CoordinatorSnapshot>,
}

impl<V, M, S> HvacRuntime<V, M, S>
where
    V: VentActuator,
    M: MotorActuator,
    S: ZoneStateStore,
{
    /// Compile `config` and start a runtime at `now`.
    pub fn from_config(
        config: &HvacConfig,
        vents: V,
        motor: M,
        store: S,
        now: Timestamp,
    ) -> AppResult<Self> {
        let compiled = compile_config(config)?;
        Ok(Self::new(compiled, vents, motor, store, now))
    }

    /// Start a runtime.
    ///
    /// Zone and coordinator state is restored from `store`. Every zone is
    /// then rechecked once and the motor reconciled, so the actuators match
    /// the restored state before the first event.
    pub fn new(compiled: CompiledConfig, vents: V, motor: M, store: S, now: Timestamp) -> Self {
        let CompiledConfig {
            name,
            motor: motor_entity,
            settings,
            zones: specs,
            generation,
        } = compiled;

        let mut zones = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            let mut zone = ZoneController::new(spec, Arc::clone(&settings), now);
            if let Some(snapshot) = store.load_zone_state(zone.id()) {
                debug!(zone = %zone.id(), vent = %snapshot.vent, "restoring zone state");
                zone.restore(snapshot, now);
            }
            index.insert(zone.id().clone(), zones.len());
            zones.push(zone);
        }

        let mut coordinator = MotorCoordinator::new();
        if let Some(memory) = store.load_coordinator_memory() {
            coordinator.restore(memory, now);
        }

        let mut runtime = Self {
            name,
            motor_entity,
            generation,
            settings,
            zones,
            index,
            coordinator,
            vents,
            motor,
            store,
            listener: None,
            last_published: None,
        };

        let mut report = DispatchReport::default();
        for idx in 0..runtime.zones.len() {
            let outcome = runtime.zones[idx].recheck(now);
            runtime.record_outcome(idx, outcome, &mut report);
        }
        runtime.sync_motor();
        runtime.last_published = Some(runtime.snapshot());

        info!(
            name = %runtime.name,
            motor = %runtime.motor_entity,
            zones = runtime.zones.len(),
            generation = %runtime.generation,
            "runtime started"
        );
        runtime
    }

    // ───────────────────────────────────────────────────────────
    // Inputs
    // ───────────────────────────────────────────────────────────

    pub fn on_temperature_changed(&mut self, zone: &ZoneId, value: f64, now: Timestamp) -> Dispatch {
        self.dispatch(
            RuntimeEvent::Temperature {
                zone: zone.clone(),
                value,
            },
            now,
        )
    }

    /// Mode as a raw string; unknown or disabled modes are ignored.
    pub fn on_mode_changed(&mut self, zone: &ZoneId, mode: &str, now: Timestamp) -> Dispatch {
        self.dispatch(
            RuntimeEvent::Mode {
                zone: zone.clone(),
                mode: mode.to_string(),
            },
            now,
        )
    }

    pub fn on_target_changed(&mut self, zone: &ZoneId, value: f64, now: Timestamp) -> Dispatch {
        self.dispatch(
            RuntimeEvent::Target {
                zone: zone.clone(),
                value,
            },
            now,
        )
    }

    pub fn on_fan_mode_changed(&mut self, zone: &ZoneId, fan_mode: &str, now: Timestamp) -> Dispatch {
        self.dispatch(
            RuntimeEvent::FanMode {
                zone: zone.clone(),
                fan_mode: fan_mode.to_string(),
            },
            now,
        )
    }

    pub fn turn_on(&mut self, zone: &ZoneId, now: Timestamp) -> Dispatch {
        self.dispatch(RuntimeEvent::TurnOn { zone: zone.clone() }, now)
    }

    pub fn turn_off(&mut self, zone: &ZoneId, now: Timestamp) -> Dispatch {
        self.dispatch(RuntimeEvent::TurnOff { zone: zone.clone() }, now)
    }

    /// Retry every change held back by the dwell window.
    pub fn tick(&mut self, now: Timestamp) -> DispatchReport {
        let mut report = DispatchReport::default();
        self.recheck_pending(now, &mut report);
        report.motor = self.sync_motor();
        self.publish_status();
        report
    }

    /// Process one event.
    pub fn dispatch(&mut self, event: RuntimeEvent, now: Timestamp) -> Dispatch {
        let mut report = DispatchReport::default();
        match self.apply_event(&event, now, &mut report) {
            Ok(()) => {
                report.motor = self.sync_motor();
                self.publish_status();
                Dispatch::Applied(report)
            }
            Err(err) => {
                warn!(?event, error = %err, "event ignored");
                Dispatch::Ignored {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Process several events with a single motor reconciliation at the end.
    ///
    /// Invalid events are skipped and their reasons collected in
    /// [`DispatchReport::ignored`].
    pub fn dispatch_batch<I>(&mut self, events: I, now: Timestamp) -> DispatchReport
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        let mut report = DispatchReport::default();
        for event in events {
            if let Err(err) = self.apply_event(&event, now, &mut report) {
                warn!(?event, error = %err, "event ignored");
                report.ignored.push(err.to_string());
            }
        }
        report.motor = self.sync_motor();
        self.publish_status();
        report
    }

    // ───────────────────────────────────────────────────────────
    // Views
    // ───────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        StatusProjector::project(&self.zones, &self.coordinator)
    }

    pub fn zone_status(&self, zone: &ZoneId) -> Option<ZoneStatus> {
        self.index.get(zone).map(|&idx| self.zones[idx].status())
    }

    /// Status of every zone in configuration order.
    pub fn zone_statuses(&self) -> Vec<ZoneStatus> {
        self.zones.iter().map(ZoneController::status).collect()
    }

    /// Earliest instant at which a held-back change becomes eligible.
    ///
    /// Hosts schedule a [`tick`](Self::tick) for it; `None` means nothing
    /// is pending.
    pub fn next_recheck_at(&self) -> Option<Timestamp> {
        self.zones.iter().filter_map(ZoneController::recheck_due_at).min()
    }

    pub fn zones(&self) -> &[ZoneController] {
        &self.zones
    }

    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn motor_entity(&self) -> &str {
        &self.motor_entity
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn last_motor_command(&self) -> Option<MotorCommand> {
        self.coordinator.last_command()
    }

    pub fn vents(&self) -> &V {
        &self.vents
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Tear the runtime down, handing back the ports.
    pub fn into_parts(self) -> (V, M, S) {
        (self.vents, self.motor, self.store)
    }

    /// Register the status listener. It is called right away with the
    /// current snapshot, then whenever the snapshot changes.
    pub fn set_status_listener(&mut self, mut listener: StatusListener) {
        let snapshot = self.snapshot();
        listener(&snapshot);
        self.last_published = Some(snapshot);
        self.listener = Some(listener);
    }

    // ───────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────

    fn zone_index(&self, zone: &ZoneId) -> ControlResult<usize> {
        self.index
            .get(zone)
            .copied()
            .ok_or_else(|| ControlError::UnknownZone {
                id: zone.to_string(),
            })
    }

    /// Apply one event to the zones. Does not touch the motor.
    fn apply_event(
        &mut self,
        event: &RuntimeEvent,
        now: Timestamp,
        report: &mut DispatchReport,
    ) -> ControlResult<()> {
        match event {
            RuntimeEvent::Temperature { zone, value } => self
                .evaluate_zone(zone, ZoneEvent::Temperature(*value), now, report)
                .map(|_| ()),
            RuntimeEvent::Mode { zone, mode } => {
                let mode: HvacMode = mode.parse()?;
                self.evaluate_selection(zone, ZoneEvent::Mode(mode), now, report)
            }
            RuntimeEvent::Target { zone, value } => {
                self.evaluate_selection(zone, ZoneEvent::Target(*value), now, report)
            }
            RuntimeEvent::FanMode { zone, fan_mode } => self.select_fan_mode(zone, fan_mode),
            RuntimeEvent::TurnOn { zone } => {
                let mode = self.zones[self.zone_index(zone)?].preferred_on_mode();
                self.evaluate_selection(zone, ZoneEvent::Mode(mode), now, report)
            }
            RuntimeEvent::TurnOff { zone } => {
                self.evaluate_selection(zone, ZoneEvent::Mode(HvacMode::Off), now, report)
            }
            RuntimeEvent::Tick => {
                self.recheck_pending(now, report);
                Ok(())
            }
        }
    }

    fn evaluate_zone(
        &mut self,
        zone: &ZoneId,
        event: ZoneEvent,
        now: Timestamp,
        report: &mut DispatchReport,
    ) -> ControlResult<usize> {
        let idx = self.zone_index(zone)?;
        let outcome = self.zones[idx].evaluate(event, now)?;
        self.record_outcome(idx, outcome, report);
        Ok(idx)
    }

    /// Like [`evaluate_zone`](Self::evaluate_zone), and also persists the
    /// user's selection when no transition already did.
    fn evaluate_selection(
        &mut self,
        zone: &ZoneId,
        event: ZoneEvent,
        now: Timestamp,
        report: &mut DispatchReport,
    ) -> ControlResult<()> {
        let transitions_before = report.transitions.len();
        let idx = self.evaluate_zone(zone, event, now, report)?;
        if report.transitions.len() == transitions_before {
            self.persist_zone(idx);
        }
        Ok(())
    }

    fn select_fan_mode(&mut self, zone: &ZoneId, fan_mode: &str) -> ControlResult<()> {
        let idx = self.zone_index(zone)?;
        self.zones[idx].set_fan_mode(fan_mode)?;
        self.coordinator.note_fan_mode(fan_mode);
        info!(zone = %zone, fan_mode, "fan mode selected");

        self.persist_zone(idx);
        let memory = self.coordinator.snapshot();
        if let Err(err) = self.store.save_coordinator_memory(&memory) {
            warn!(error = %err, "failed to persist coordinator memory");
        }
        Ok(())
    }

    fn recheck_pending(&mut self, now: Timestamp, report: &mut DispatchReport) {
        for idx in 0..self.zones.len() {
            if self.zones[idx].pending().is_none() {
                continue;
            }
            let outcome = self.zones[idx].recheck(now);
            self.record_outcome(idx, outcome, report);
        }
    }

    /// Actuate and persist a zone's outcome. The zone state is already
    /// updated, so the motor reconciliation that follows sees it.
    fn record_outcome(&mut self, idx: usize, outcome: ZoneOutcome, report: &mut DispatchReport) {
        let id = self.zones[idx].id().clone();
        if let Some(transition) = outcome.transition {
            self.vents.set_vent(&id, transition.to);
            self.persist_zone(idx);
            report.transitions.push(ZoneTransition {
                zone: id,
                transition,
            });
        } else if outcome.deferred.is_some() {
            report.deferred.push(id);
        }
    }

    fn persist_zone(&mut self, idx: usize) {
        let zone = &self.zones[idx];
        let snapshot = zone.snapshot();
        if let Err(err) = self.store.save_zone_state(zone.id(), &snapshot) {
            warn!(zone = %zone.id(), error = %err, "failed to persist zone state");
        }
    }

    fn sync_motor(&mut self) -> MotorUpdate {
        let update = self.coordinator.sync(&self.zones);
        match update.command {
            Some(MotorCommand::Off) => self.motor.set_motor_off(),
            Some(MotorCommand::Run { mode, setpoint }) => self.motor.set_motor(mode, setpoint),
            None => {}
        }
        if let Some(fan_mode) = &update.fan_mode {
            self.motor.set_fan_mode(fan_mode);
        }
        update
    }

    fn publish_status(&mut self) {
        let snapshot = self.snapshot();
        if self.last_published.as_ref() == Some(&snapshot) {
            return;
        }
        debug!(status = %snapshot.label(), "status changed");
        if let Some(listener) = self.listener.as_mut() {
            listener(&snapshot);
        }
        self.last_published = Some(snapshot);
    }
}
