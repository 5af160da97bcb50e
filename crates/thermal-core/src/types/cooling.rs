//! Cooling-device definitions.

use serde::{Deserialize, Serialize};

/// Kind of actuator a cooling device drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoolingType {
    Fan,
    Battery,
    Cpu,
    Gpu,
    Modem,
    Npu,
    Component,
}

/// Immutable definition of one cooling device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdevInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub cdev_type: CoolingType,
    /// Power threshold per state, usually highest first. The index of the
    /// first threshold a budget exceeds is the state requested for that
    /// budget; the last state when none is exceeded.
    #[serde(default, alias = "power2state")]
    pub power_to_state: Vec<f64>,
}

impl CdevInfo {
    /// Highest state index the power curve can select.
    pub fn max_state(&self) -> usize {
        self.power_to_state.len().saturating_sub(1)
    }
}
