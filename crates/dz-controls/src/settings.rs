//! Global settings shared by every controller of one configuration.
//!
//! Settings are immutable for the lifetime of a configuration generation and
//! are handed out behind an `Arc`. Reconfiguring means building new settings
//! and new controllers, never patching these in place.

use chrono::TimeDelta;
use dz_core::{ensure_within, quantize_to_step, seconds_to_delta};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::mode::HvacMode;

/// Control parameters shared across zones and the motor coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Half-width of the hysteresis dead-band (degrees).
    pub tolerance: f64,
    /// Minimum seconds between two vent transitions of one zone. 0 disables.
    pub min_cycle_duration_s: f64,
    /// Lowest accepted target temperature.
    pub min_temp: f64,
    /// Highest accepted target temperature.
    pub max_temp: f64,
    /// Target temperature granularity.
    pub temp_step: f64,
    /// Modes zones may select. Always contains `off`, first.
    pub modes: Vec<HvacMode>,
    /// Fan modes zones may select. Empty disables fan mode support.
    #[serde(default)]
    pub fan_modes: Vec<String>,
}

impl GlobalSettings {
    /// Create validated settings.
    ///
    /// `off` is added to `modes` when missing and duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidArg`] when the temperature range is
    /// empty, the step is not positive, tolerance or dwell time are negative,
    /// or no mode besides `off` is enabled.
    pub fn new(
        tolerance: f64,
        min_cycle_duration_s: f64,
        min_temp: f64,
        max_temp: f64,
        temp_step: f64,
        modes: &[HvacMode],
    ) -> ControlResult<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "tolerance must be non-negative",
            });
        }
        if !min_cycle_duration_s.is_finite() || min_cycle_duration_s < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "min_cycle_duration must be non-negative",
            });
        }
        if !min_temp.is_finite() || !max_temp.is_finite() || min_temp >= max_temp {
            return Err(ControlError::InvalidArg {
                what: "min_temp must be less than max_temp",
            });
        }
        if !temp_step.is_finite() || temp_step <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "temp_step must be positive",
            });
        }

        let mut normalized = vec![HvacMode::Off];
        for mode in modes {
            if !normalized.contains(mode) {
                normalized.push(*mode);
            }
        }
        if normalized.len() < 2 {
            return Err(ControlError::InvalidArg {
                what: "at least one mode besides off must be enabled",
            });
        }

        Ok(Self {
            tolerance,
            min_cycle_duration_s,
            min_temp,
            max_temp,
            temp_step,
            modes: normalized,
            fan_modes: Vec::new(),
        })
    }

    /// Enable fan mode selection.
    pub fn with_fan_modes(mut self, fan_modes: Vec<String>) -> Self {
        self.fan_modes = fan_modes;
        self
    }

    /// Dwell window as a duration.
    pub fn min_cycle(&self) -> TimeDelta {
        seconds_to_delta(self.min_cycle_duration_s)
    }

    pub fn allows_mode(&self, mode: HvacMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn supports_fan_mode(&self, fan_mode: &str) -> bool {
        self.fan_modes.iter().any(|m| m == fan_mode)
    }

    /// Initial target for a zone with no restored value: the midpoint of the
    /// bounds, snapped to the step grid.
    pub fn default_target(&self) -> f64 {
        let mid = (self.min_temp + self.max_temp) / 2.0;
        quantize_to_step(mid, self.min_temp, self.temp_step).clamp(self.min_temp, self.max_temp)
    }

    /// Check a requested target against the bounds and snap it to the step.
    pub fn normalize_target(&self, value: f64) -> ControlResult<f64> {
        let value = ensure_within(value, self.min_temp, self.max_temp, "target temperature")?;
        Ok(quantize_to_step(value, self.min_temp, self.temp_step)
            .clamp(self.min_temp, self.max_temp))
    }

    /// First non-`off` mode, preferring `cool` when enabled.
    pub fn preferred_on_mode(&self) -> HvacMode {
        if self.allows_mode(HvacMode::Cool) {
            return HvacMode::Cool;
        }
        self.modes
            .iter()
            .copied()
            .find(|m| *m != HvacMode::Off)
            .unwrap_or(HvacMode::Off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GlobalSettings {
        GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.5, &HvacMode::ALL).unwrap()
    }

    #[test]
    fn off_is_always_first() {
        let s = GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.5, &[HvacMode::Heat, HvacMode::Heat])
            .unwrap();
        assert_eq!(s.modes, vec![HvacMode::Off, HvacMode::Heat]);
    }

    #[test]
    fn invalid_settings() {
        // Empty temperature range
        assert!(GlobalSettings::new(0.3, 0.0, 30.0, 16.0, 0.5, &HvacMode::ALL).is_err());
        // Non-positive step
        assert!(GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.0, &HvacMode::ALL).is_err());
        // Negative tolerance / dwell
        assert!(GlobalSettings::new(-0.1, 0.0, 16.0, 30.0, 0.5, &HvacMode::ALL).is_err());
        assert!(GlobalSettings::new(0.3, -1.0, 16.0, 30.0, 0.5, &HvacMode::ALL).is_err());
        // Only off
        assert!(GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.5, &[HvacMode::Off]).is_err());
    }

    #[test]
    fn default_target_is_midpoint() {
        assert_eq!(settings().default_target(), 23.0);
        let odd = GlobalSettings::new(0.3, 0.0, 17.0, 30.0, 1.0, &HvacMode::ALL).unwrap();
        // 23.5 rounds half away from zero onto the 1.0 grid
        assert_eq!(odd.default_target(), 24.0);
    }

    #[test]
    fn normalize_target_checks_bounds() {
        let s = settings();
        assert_eq!(s.normalize_target(22.3).unwrap(), 22.5);
        assert_eq!(s.normalize_target(30.0).unwrap(), 30.0);
        assert!(s.normalize_target(31.0).is_err());
        assert!(s.normalize_target(f64::NAN).is_err());
    }

    #[test]
    fn preferred_on_mode_prefers_cool() {
        assert_eq!(settings().preferred_on_mode(), HvacMode::Cool);
        let heat_only =
            GlobalSettings::new(0.3, 0.0, 16.0, 30.0, 0.5, &[HvacMode::Dry, HvacMode::Heat])
                .unwrap();
        assert_eq!(heat_only.preferred_on_mode(), HvacMode::Dry);
    }

    #[test]
    fn fan_modes_are_opt_in() {
        let s = settings();
        assert!(!s.supports_fan_mode("auto"));
        let s = s.with_fan_modes(vec!["auto".into(), "high".into()]);
        assert!(s.supports_fan_mode("high"));
        assert!(!s.supports_fan_mode("turbo"));
    }

    #[test]
    fn min_cycle_duration() {
        let s = GlobalSettings::new(0.3, 300.0, 16.0, 30.0, 0.5, &HvacMode::ALL).unwrap();
        assert_eq!(s.min_cycle(), TimeDelta::seconds(300));
        assert_eq!(settings().min_cycle(), TimeDelta::zero());
    }
}
