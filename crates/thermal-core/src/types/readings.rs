//! Values handed to query callers and event handlers.

use serde::{Deserialize, Serialize};

use super::cooling::CoolingType;
use super::sensor::SensorType;
use super::throttling::{nan_array, ThrottlingArray};
use crate::severity::Severity;

/// A scaled sensor reading with its classified severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub name: String,
    pub sensor_type: SensorType,
    pub value: f64,
    /// Max of the hot and cold severities.
    pub throttling_status: Severity,
}

/// Configured thresholds of one sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureThreshold {
    pub name: String,
    pub sensor_type: SensorType,
    #[serde(with = "nan_array")]
    pub hot_thresholds: ThrottlingArray,
    #[serde(with = "nan_array")]
    pub cold_thresholds: ThrottlingArray,
    pub vr_threshold: Option<f64>,
}

/// Current state of one cooling device as read back from I/O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolingDevice {
    pub name: String,
    pub cdev_type: CoolingType,
    pub value: i64,
}
