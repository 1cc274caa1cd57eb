//! Config normalization and validation.

use std::collections::HashSet;

use dz_controls::HvacMode;
use dz_core::slugify;

use crate::schema::{HvacConfig, ZoneDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Bring a config into canonical form.
///
/// - `off` is first in `modes`, duplicates dropped
/// - zone names and entity ids are trimmed
/// - every zone has a `unique_id` (name slug unless given)
pub fn normalize_config(config: &HvacConfig) -> HvacConfig {
    let mut normalized = config.clone();

    let mut modes = vec![HvacMode::Off];
    for mode in &config.modes {
        if !modes.contains(mode) {
            modes.push(*mode);
        }
    }
    normalized.modes = modes;

    normalized.name = config.name.trim().to_string();
    normalized.motor = config.motor.trim().to_string();
    normalized.zones = config.zones.iter().map(normalize_zone).collect();
    normalized
}

fn normalize_zone(zone: &ZoneDef) -> ZoneDef {
    let name = zone.name.trim().to_string();
    let unique_id = zone
        .unique_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| slugify(&name));
    ZoneDef {
        unique_id: Some(unique_id),
        name,
        vent: zone.vent.trim().to_string(),
        sensor: zone.sensor.trim().to_string(),
    }
}

/// Check a config. Runs on the normalized form, so unnormalized input is
/// accepted as long as normalizing it yields a valid config.
pub fn validate_config(config: &HvacConfig) -> Result<(), ValidationError> {
    let config = normalize_config(config);

    if config.motor.is_empty() {
        return Err(ValidationError::Missing {
            field: "motor".to_string(),
        });
    }

    validate_finite("min_temp", config.min_temp)?;
    validate_finite("max_temp", config.max_temp)?;
    if config.min_temp >= config.max_temp {
        return Err(ValidationError::InvalidValue {
            field: "min_temp".to_string(),
            value: config.min_temp.to_string(),
            reason: format!("must be less than max_temp ({})", config.max_temp),
        });
    }
    validate_positive_finite("temp_step", config.temp_step)?;
    validate_non_negative_finite("tolerance", config.tolerance)?;
    validate_non_negative_finite("min_cycle_duration", config.min_cycle_duration)?;

    if config.modes.len() < 2 {
        return Err(ValidationError::InvalidValue {
            field: "modes".to_string(),
            value: "[off]".to_string(),
            reason: "at least one mode besides off is required".to_string(),
        });
    }

    let mut fan_modes = HashSet::new();
    for fan_mode in &config.fan_modes {
        if fan_mode.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: "fan_modes entry".to_string(),
            });
        }
        if !fan_modes.insert(fan_mode.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: fan_mode.clone(),
                context: "fan_modes".to_string(),
            });
        }
    }

    if config.zones.is_empty() {
        return Err(ValidationError::Missing {
            field: "zones".to_string(),
        });
    }

    let mut zone_ids = HashSet::new();
    for (index, zone) in config.zones.iter().enumerate() {
        validate_zone(index, zone)?;
        let id = zone.unique_id.clone().unwrap_or_default();
        if !zone_ids.insert(id.clone()) {
            return Err(ValidationError::DuplicateId {
                id,
                context: format!("zone '{}'", zone.name),
            });
        }
    }

    Ok(())
}

fn validate_zone(index: usize, zone: &ZoneDef) -> Result<(), ValidationError> {
    if zone.name.is_empty() {
        return Err(ValidationError::Missing {
            field: format!("zones[{index}].name"),
        });
    }
    // A name made only of punctuation slugs to nothing.
    if zone.unique_id.as_deref().is_none_or(str::is_empty) {
        return Err(ValidationError::InvalidValue {
            field: format!("zones[{index}].name"),
            value: zone.name.clone(),
            reason: "cannot derive an id; set unique_id".to_string(),
        });
    }
    if zone.vent.is_empty() {
        return Err(ValidationError::Missing {
            field: format!("zone '{}' vent", zone.name),
        });
    }
    if zone.sensor.is_empty() {
        return Err(ValidationError::Missing {
            field: format!("zone '{}' sensor", zone.name),
        });
    }
    Ok(())
}

fn validate_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_positive_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HvacConfig {
        HvacConfig::new("climate.ducted")
            .with_zone(ZoneDef::new("Living Room", "switch.living", "sensor.living"))
            .with_zone(ZoneDef::new("Bedroom", "switch.bed", "sensor.bed"))
    }

    #[test]
    fn normalize_inserts_off_and_slugs() {
        let mut cfg = config();
        cfg.modes = vec![HvacMode::Cool, HvacMode::Heat, HvacMode::Cool];
        cfg.zones[0].name = "  Living Room ".to_string();

        let n = normalize_config(&cfg);
        assert_eq!(n.modes, vec![HvacMode::Off, HvacMode::Cool, HvacMode::Heat]);
        assert_eq!(n.zones[0].name, "Living Room");
        assert_eq!(n.zones[0].unique_id.as_deref(), Some("living_room"));
        assert_eq!(n.zones[1].unique_id.as_deref(), Some("bedroom"));
    }

    #[test]
    fn explicit_unique_id_is_kept() {
        let mut cfg = config();
        cfg.zones[0].unique_id = Some("zone_1".to_string());
        assert_eq!(
            normalize_config(&cfg).zones[0].unique_id.as_deref(),
            Some("zone_1")
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_config(&config());
        assert_eq!(normalize_config(&once), once);
    }

    #[test]
    fn default_config_is_valid() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn rejects_bad_temperature_range() {
        let mut cfg = config();
        cfg.min_temp = 30.0;
        cfg.max_temp = 16.0;
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::InvalidValue { field, .. }) if field == "min_temp"
        ));
    }

    #[test]
    fn rejects_only_off_mode() {
        let mut cfg = config();
        cfg.modes = vec![HvacMode::Off];
        assert!(validate_config(&cfg).is_err());
        cfg.modes = vec![];
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_duplicate_zone_names() {
        let cfg = config().with_zone(ZoneDef::new("living room", "switch.x", "sensor.x"));
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::DuplicateId { id, .. }) if id == "living_room"
        ));
    }

    #[test]
    fn rejects_empty_fields() {
        let mut cfg = config();
        cfg.zones[1].name = "   ".to_string();
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::Missing { .. })
        ));

        let mut cfg = config();
        cfg.zones[0].sensor.clear();
        assert!(validate_config(&cfg).is_err());

        let mut cfg = config();
        cfg.motor.clear();
        assert!(validate_config(&cfg).is_err());

        let cfg = HvacConfig::new("climate.ducted");
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::Missing { field }) if field == "zones"
        ));
    }

    #[test]
    fn rejects_unsluggable_name() {
        let cfg = config().with_zone(ZoneDef::new("???", "switch.q", "sensor.q"));
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_negative_durations_and_steps() {
        let mut cfg = config();
        cfg.min_cycle_duration = -5.0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = config();
        cfg.temp_step = 0.0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = config();
        cfg.tolerance = f64::NAN;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn rejects_duplicate_fan_modes() {
        let mut cfg = config();
        cfg.fan_modes = vec!["auto".into(), "auto".into()];
        assert!(matches!(
            validate_config(&cfg),
            Err(ValidationError::DuplicateId { .. })
        ));
        cfg.fan_modes.clear();
        validate_config(&cfg).unwrap();
    }
}
