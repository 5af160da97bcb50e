//! Sensor read errors. Per tick these skip the sensor; they never abort a pass.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor not found: {name}")]
    NotFound { name: String },

    #[error("Failed to read sensor {name}: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("Sensor {name} returned unparsable value {raw:?}")]
    Unparsable { name: String, raw: String },

    #[error("Virtual sensor {name} has no readable sources")]
    NoReadableSources { name: String },
}

impl ThermalErrorCode for SensorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::SENSOR_NOT_FOUND,
            _ => error_code::SENSOR_READ_FAILED,
        }
    }
}
