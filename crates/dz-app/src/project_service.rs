//! Config loading, saving, validation, and introspection.

use std::path::Path;

use dz_project::{ConfigFormat, HvacConfig};

use crate::error::{AppError, AppResult};

/// Summary of a zone for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSummary {
    pub id: String,
    pub name: String,
    pub vent: String,
    pub sensor: String,
}

/// Load, validate and normalize a config file (YAML, or JSON by extension).
pub fn load_config(path: &Path) -> AppResult<HvacConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(dz_project::parse_config(&content, ConfigFormat::from_path(path))?)
}

/// Save a config file.
pub fn save_config(path: &Path, config: &HvacConfig) -> AppResult<()> {
    Ok(dz_project::save_config(path, config)?)
}

/// Validate config structure.
pub fn validate_config(config: &HvacConfig) -> AppResult<()> {
    Ok(dz_project::validate_config(config)?)
}

/// Zones of a config in configuration order.
pub fn list_zones(config: &HvacConfig) -> Vec<ZoneSummary> {
    dz_project::normalize_config(config)
        .zones
        .into_iter()
        .map(|zone| ZoneSummary {
            id: zone.unique_id.unwrap_or_default(),
            name: zone.name,
            vent: zone.vent,
            sensor: zone.sensor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dz_project::ZoneDef;

    #[test]
    fn list_zones_in_order_with_ids() {
        let config = HvacConfig::new("climate.unit")
            .with_zone(ZoneDef::new("Upstairs Hall", "switch.hall", "sensor.hall"))
            .with_zone(ZoneDef::new("Den", "switch.den", "sensor.den"));
        let zones = list_zones(&config);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, "upstairs_hall");
        assert_eq!(zones[1].name, "Den");
    }

    #[test]
    fn missing_file_reports_path() {
        let path = std::env::temp_dir().join("dz_app_missing_config.yaml");
        let _ = std::fs::remove_file(&path);
        match load_config(&path) {
            Err(AppError::ConfigFileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
