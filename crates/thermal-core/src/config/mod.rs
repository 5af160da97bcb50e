//! Configuration system for the thermal engine.
//! Engine settings are TOML with layered resolution: overrides > env > file > defaults.
//! Sensor and cooling-device definitions are JSON.

pub mod definitions;
pub mod definitions_config;
pub mod engine_config;
pub mod logging_config;
pub mod power_hint_config;
pub mod watcher_config;

pub use definitions::ThermalDefinitions;
pub use definitions_config::DefinitionsConfig;
pub use engine_config::{ConfigOverrides, EngineConfig};
pub use logging_config::LoggingConfig;
pub use power_hint_config::PowerHintConfig;
pub use watcher_config::WatcherConfig;
