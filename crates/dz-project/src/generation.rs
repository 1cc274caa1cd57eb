//! Content fingerprint of a configuration.
//!
//! Persisted state records the generation it was written under, so a
//! restart can tell whether the configuration changed in between.

use sha2::{Digest, Sha256};

use crate::ProjectResult;
use crate::schema::HvacConfig;
use crate::validate::normalize_config;

/// SHA-256 of the normalized config, hex encoded.
///
/// Two configs that normalize to the same thing share a generation.
pub fn config_generation(config: &HvacConfig) -> ProjectResult<String> {
    let normalized = normalize_config(config);
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(&normalized)?;
    hasher.update(config_json.as_bytes());

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ZoneDef;
    use dz_controls::HvacMode;

    fn config() -> HvacConfig {
        HvacConfig::new("climate.ducted")
            .with_zone(ZoneDef::new("Study", "switch.study", "sensor.study"))
    }

    #[test]
    fn generation_stability() {
        let a = config_generation(&config()).unwrap();
        let b = config_generation(&config()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn generation_ignores_normalization_noise() {
        let mut noisy = config();
        noisy.zones[0].name = " Study ".to_string();
        noisy.modes = vec![HvacMode::Heat, HvacMode::Cool, HvacMode::FanOnly, HvacMode::Dry];
        assert_eq!(config_generation(&noisy).unwrap(), config_generation(&config()).unwrap());
    }

    #[test]
    fn generation_differs_for_different_inputs() {
        let mut other = config();
        other.tolerance = 0.5;
        assert_ne!(config_generation(&other).unwrap(), config_generation(&config()).unwrap());
    }
}
