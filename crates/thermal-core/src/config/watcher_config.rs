//! Evaluation watcher configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIN_POLL_INTERVAL_MS, DEFAULT_PASSIVE_DELAY_MS, DEFAULT_POLLING_DELAY_MS,
};

/// Configuration for the evaluation watcher.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatcherConfig {
    /// Floor for the wait between passes. Default: 2000.
    pub min_poll_interval_ms: Option<u64>,
    /// Polling delay for sensors whose definition omits one. Default: 300000.
    pub default_polling_delay_ms: Option<u64>,
    /// Passive delay for sensors whose definition omits one. Default: 7000.
    pub default_passive_delay_ms: Option<u64>,
}

impl WatcherConfig {
    pub fn effective_min_poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.min_poll_interval_ms
                .unwrap_or(DEFAULT_MIN_POLL_INTERVAL_MS),
        )
    }

    pub fn effective_polling_delay(&self) -> Duration {
        Duration::from_millis(
            self.default_polling_delay_ms
                .unwrap_or(DEFAULT_POLLING_DELAY_MS),
        )
    }

    pub fn effective_passive_delay(&self) -> Duration {
        Duration::from_millis(
            self.default_passive_delay_ms
                .unwrap_or(DEFAULT_PASSIVE_DELAY_MS),
        )
    }
}
