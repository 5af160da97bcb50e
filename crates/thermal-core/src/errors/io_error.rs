//! Raw I/O collaborator errors.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("No file bound for {id}")]
    NotFound { id: String },

    #[error("I/O on {id} failed: {reason}")]
    Failed { id: String, reason: String },
}

impl ThermalErrorCode for IoError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::BINDING_FAILED,
            Self::Failed { .. } => error_code::SENSOR_READ_FAILED,
        }
    }
}
