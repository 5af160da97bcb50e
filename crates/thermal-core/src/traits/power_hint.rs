//! Platform power-hint service.

use crate::errors::PowerHintError;

/// The remote service that receives thermal power-hint modes.
///
/// Any `Err` from a call means the connection is gone; callers drop it and
/// reconnect through [`PowerHintService::connect`] before the next call.
pub trait PowerHintService: Send + Sync {
    /// Establish (or re-establish) the connection.
    fn connect(&self) -> Result<(), PowerHintError>;

    fn is_mode_supported(&self, hint: &str) -> Result<bool, PowerHintError>;

    fn set_mode(&self, hint: &str, enable: bool) -> Result<(), PowerHintError>;
}
