//! Cooling-device errors.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CdevError {
    #[error("Cooling device not found: {name}")]
    NotFound { name: String },

    #[error("Failed to write state {state} to cooling device {name}: {reason}")]
    WriteFailed {
        name: String,
        state: i64,
        reason: String,
    },

    #[error("Failed to read cooling device {name}: {reason}")]
    ReadFailed { name: String, reason: String },
}

impl ThermalErrorCode for CdevError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::CDEV_NOT_FOUND,
            Self::WriteFailed { .. } => error_code::CDEV_WRITE_FAILED,
            Self::ReadFailed { .. } => error_code::SENSOR_READ_FAILED,
        }
    }
}
