//! Compilation of a validated config into runtime building blocks.

use std::sync::Arc;

use dz_controls::{GlobalSettings, ZoneSpec};
use dz_project::{HvacConfig, config_generation, normalize_config, validate_config};

use crate::error::{AppError, AppResult};

/// Everything a runtime needs, derived from one configuration generation.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    pub name: String,
    /// Entity id of the shared motor.
    pub motor: String,
    pub settings: Arc<GlobalSettings>,
    /// Zones in configuration order.
    pub zones: Vec<ZoneSpec>,
    pub generation: String,
}

/// Validate, normalize and compile a config.
pub fn compile_config(config: &HvacConfig) -> AppResult<CompiledConfig> {
    validate_config(config)?;
    let config = normalize_config(config);

    let settings = GlobalSettings::new(
        config.tolerance,
        config.min_cycle_duration,
        config.min_temp,
        config.max_temp,
        config.temp_step,
        &config.modes,
    )
    .map_err(|e| AppError::Compile(e.to_string()))?
    .with_fan_modes(config.fan_modes.clone());

    let zones = config
        .zones
        .iter()
        .map(|zone| {
            let spec = ZoneSpec::new(&zone.name, &zone.vent, &zone.sensor);
            match &zone.unique_id {
                Some(id) => spec.with_id(id.as_str()),
                None => spec,
            }
        })
        .collect();

    Ok(CompiledConfig {
        generation: config_generation(&config)?,
        name: config.name,
        motor: config.motor,
        settings: Arc::new(settings),
        zones,
    })
}
