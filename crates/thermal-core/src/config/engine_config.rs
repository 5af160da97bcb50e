//! Top-level engine configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DefinitionsConfig, LoggingConfig, PowerHintConfig, WatcherConfig};
use crate::constants::ENGINE_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`THERMAL_*`)
/// 3. `thermal.toml` in the config directory
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub watcher: WatcherConfig,
    pub power_hint: PowerHintConfig,
    pub logging: LoggingConfig,
    pub definitions: DefinitionsConfig,
}

/// Overrides supplied by the embedding process (highest priority).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub min_poll_interval_ms: Option<u64>,
    pub power_hint_enabled: Option<bool>,
    pub definitions_path: Option<String>,
}

impl EngineConfig {
    /// Load configuration with layered resolution from `config_dir`.
    ///
    /// A missing `thermal.toml` is not an error; an unparsable one is.
    pub fn load(
        config_dir: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file_path = config_dir.join(ENGINE_CONFIG_FILE);
        if file_path.exists() {
            Self::merge_toml_file(&mut config, &file_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
        let checks = [
            ("watcher.min_poll_interval_ms", config.watcher.min_poll_interval_ms),
            (
                "watcher.default_polling_delay_ms",
                config.watcher.default_polling_delay_ms,
            ),
            (
                "watcher.default_passive_delay_ms",
                config.watcher.default_passive_delay_ms,
            ),
        ];
        for (field, value) in checks {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    fn merge_toml_file(config: &mut EngineConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: EngineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut EngineConfig, other: &EngineConfig) {
        if other.watcher.min_poll_interval_ms.is_some() {
            base.watcher.min_poll_interval_ms = other.watcher.min_poll_interval_ms;
        }
        if other.watcher.default_polling_delay_ms.is_some() {
            base.watcher.default_polling_delay_ms = other.watcher.default_polling_delay_ms;
        }
        if other.watcher.default_passive_delay_ms.is_some() {
            base.watcher.default_passive_delay_ms = other.watcher.default_passive_delay_ms;
        }
        if other.power_hint.enabled.is_some() {
            base.power_hint.enabled = other.power_hint.enabled;
        }
        if other.logging.filter.is_some() {
            base.logging.filter = other.logging.filter.clone();
        }
        if other.definitions.path.is_some() {
            base.definitions.path = other.definitions.path.clone();
        }
    }

    /// Pattern: `THERMAL_MIN_POLL_INTERVAL_MS`, `THERMAL_POWER_HINT_ENABLED`, etc.
    /// Unparsable values are ignored.
    fn apply_env_overrides(config: &mut EngineConfig) {
        if let Some(v) = env_parse::<u64>("THERMAL_MIN_POLL_INTERVAL_MS") {
            config.watcher.min_poll_interval_ms = Some(v);
        }
        if let Some(v) = env_parse::<u64>("THERMAL_POLLING_DELAY_MS") {
            config.watcher.default_polling_delay_ms = Some(v);
        }
        if let Some(v) = env_parse::<u64>("THERMAL_PASSIVE_DELAY_MS") {
            config.watcher.default_passive_delay_ms = Some(v);
        }
        if let Some(v) = env_parse::<bool>("THERMAL_POWER_HINT_ENABLED") {
            config.power_hint.enabled = Some(v);
        }
        if let Ok(v) = std::env::var("THERMAL_DEFINITIONS_PATH") {
            config.definitions.path = Some(v);
        }
    }

    fn apply_overrides(config: &mut EngineConfig, o: &ConfigOverrides) {
        if let Some(v) = o.min_poll_interval_ms {
            config.watcher.min_poll_interval_ms = Some(v);
        }
        if let Some(v) = o.power_hint_enabled {
            config.power_hint.enabled = Some(v);
        }
        if let Some(ref v) = o.definitions_path {
            config.definitions.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
