//! dz-project: configuration file format and validation.

pub mod generation;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use generation::config_generation;
pub use schema::*;
pub use validate::{ValidationError, normalize_config, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse, validate and normalize a config from text.
pub fn parse_config(content: &str, format: ConfigFormat) -> ProjectResult<HvacConfig> {
    let config: HvacConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    validate_config(&config)?;
    Ok(normalize_config(&config))
}

/// Load a config file. The returned config is validated and normalized.
pub fn load_config(path: &Path) -> ProjectResult<HvacConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Validate and write a config file in the format its extension names.
pub fn save_config(path: &Path, config: &HvacConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = match ConfigFormat::from_path(path) {
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}
