//! Power-hint bridge configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PowerHintConfig {
    /// Forward severity changes to the power-hint service. Default: true.
    pub enabled: Option<bool>,
}

impl PowerHintConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}
