//! Power-hint service errors.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum PowerHintError {
    #[error("Power hint service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Power hint call failed for {hint}: {reason}")]
    CallFailed { hint: String, reason: String },
}

impl ThermalErrorCode for PowerHintError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::POWER_HINT_UNAVAILABLE,
            Self::CallFailed { .. } => error_code::POWER_HINT_FAILED,
        }
    }
}
