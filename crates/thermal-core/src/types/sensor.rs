//! Sensor definitions, including virtual sensors composed from other sensors.

use serde::{Deserialize, Serialize};

use super::collections::SmallVec4;
use super::throttling::{nan_array, ThrottlingArray, ThrottlingInfo};

/// Kind of temperature a sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Unknown,
    Cpu,
    Gpu,
    Battery,
    Skin,
    UsbPort,
    PowerAmplifier,
    BclVoltage,
    BclCurrent,
    BclPercentage,
    Npu,
}

/// How a virtual sensor combines its linked sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Formula {
    /// Number of sources past |coefficient|; a negative coefficient counts
    /// sources below it instead of above.
    CountThreshold,
    /// Sum of reading × coefficient.
    WeightedAvg,
    /// Largest reading × coefficient.
    Maximum,
    /// Smallest reading × coefficient.
    Minimum,
}

/// One source of a virtual sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedSensor {
    pub name: String,
    /// `None` excludes the source from the formula.
    pub coefficient: Option<f64>,
}

/// Composition of a virtual sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualSensorInfo {
    pub linked_sensors: SmallVec4<LinkedSensor>,
    pub formula: Formula,
    /// Physical sensor whose notifications make this sensor due.
    pub trigger_sensor: String,
}

/// Immutable definition of one sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub hot_thresholds: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::zeros")]
    pub hot_hysteresis: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub cold_thresholds: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::zeros")]
    pub cold_hysteresis: ThrottlingArray,
    #[serde(default)]
    pub vr_threshold: Option<f64>,
    /// Scale applied to the raw reading.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Interval between evaluations at severity NONE.
    #[serde(default)]
    pub polling_delay_ms: Option<u64>,
    /// Interval between evaluations while throttling.
    #[serde(default)]
    pub passive_delay_ms: Option<u64>,
    /// Whether the sensor takes part in evaluation passes.
    #[serde(default)]
    pub monitor: bool,
    /// Whether severity changes are delivered to event handlers.
    #[serde(default)]
    pub send_callback: bool,
    /// Whether severity changes are forwarded to the power-hint service.
    #[serde(default)]
    pub send_power_hint: bool,
    /// Whether the sensor raises asynchronous notifications. Sensors that
    /// do not are polled at the minimum interval.
    #[serde(default)]
    pub supports_notification: bool,
    #[serde(default)]
    pub virtual_sensor: Option<VirtualSensorInfo>,
    #[serde(default)]
    pub throttling: Option<ThrottlingInfo>,
}

fn default_multiplier() -> f64 {
    1.0
}

impl SensorInfo {
    pub fn is_virtual(&self) -> bool {
        self.virtual_sensor.is_some()
    }

    /// Name carried by asynchronous notifications for this sensor.
    pub fn trigger_name(&self) -> &str {
        self.virtual_sensor
            .as_ref()
            .map(|v| v.trigger_sensor.as_str())
            .unwrap_or(&self.name)
    }
}
