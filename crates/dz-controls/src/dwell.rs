//! Minimum dwell time between vent transitions.
//!
//! The dwell timer is not a running timer: it is the last transition instant
//! plus a window, checked against whatever `now` the caller evaluates at.
//! The last transition instant is plain data, so it is persisted and
//! restored verbatim; the window itself comes from the settings.

use chrono::TimeDelta;
use dz_core::{Timestamp, add_saturating};

/// Tracks when a zone's vent last moved and whether it may move again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellTimer {
    /// Minimum time between transitions. Zero disables debouncing.
    pub min_cycle: TimeDelta,
    /// Instant of the last applied transition (or process start).
    pub last_transition: Timestamp,
}

impl DwellTimer {
    pub fn new(min_cycle: TimeDelta, last_transition: Timestamp) -> Self {
        Self {
            min_cycle,
            last_transition,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.min_cycle > TimeDelta::zero()
    }

    /// Earliest instant at which another transition is allowed.
    pub fn ready_at(&self) -> Timestamp {
        add_saturating(self.last_transition, self.min_cycle)
    }

    /// Check if a transition is allowed at `now`.
    ///
    /// Returns `true` when debouncing is disabled or at least `min_cycle`
    /// has passed since the last transition.
    pub fn has_elapsed(&self, now: Timestamp) -> bool {
        !self.is_enabled() || now >= self.ready_at()
    }

    /// Time left until a transition is allowed (zero once ready).
    pub fn time_until_ready(&self, now: Timestamp) -> TimeDelta {
        if self.has_elapsed(now) {
            TimeDelta::zero()
        } else {
            self.ready_at() - now
        }
    }

    /// Record a transition at `now`.
    pub fn mark(&mut self, now: Timestamp) {
        self.last_transition = now;
    }
}
