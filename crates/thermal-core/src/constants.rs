//! Shared constants for the thermal control engine.

/// Number of severity levels, NONE through SHUTDOWN.
pub const SEVERITY_COUNT: usize = 7;

/// Floor for the watcher wait between evaluation passes (milliseconds).
pub const DEFAULT_MIN_POLL_INTERVAL_MS: u64 = 2_000;

/// Polling delay for a sensor at severity NONE when the definition omits one.
pub const DEFAULT_POLLING_DELAY_MS: u64 = 300_000;

/// Polling delay for a throttling sensor when the definition omits one.
pub const DEFAULT_PASSIVE_DELAY_MS: u64 = 7_000;

/// Maximum number of linked sources a virtual sensor may combine.
pub const MAX_LINKED_SENSORS: usize = 10;

/// Prefix of every power-hint mode name: `THERMAL_<SENSOR>_<SEVERITY>`.
pub const POWER_HINT_PREFIX: &str = "THERMAL";

/// Default file name for engine settings inside the config directory.
pub const ENGINE_CONFIG_FILE: &str = "thermal.toml";

/// Default file name for sensor and cooling-device definitions.
pub const DEFINITIONS_FILE: &str = "thermal_info_config.json";

/// Default tracing filter when `THERMAL_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "thermal=info";
