//! Power allocation errors.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("Sensor {sensor} has zero total cooling-device weight")]
    ZeroWeight { sensor: String },
}

impl ThermalErrorCode for AllocationError {
    fn error_code(&self) -> &'static str {
        error_code::ZERO_WEIGHT
    }
}
