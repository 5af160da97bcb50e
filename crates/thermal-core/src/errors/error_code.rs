//! Stable error codes for log records and external callers.

/// Every error enum implements this to expose a structured code string.
pub trait ThermalErrorCode {
    /// Returns the error code string (e.g., "SENSOR_READ_FAILED").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_INTEGRITY: &str = "CONFIG_INTEGRITY";
pub const SENSOR_NOT_FOUND: &str = "SENSOR_NOT_FOUND";
pub const SENSOR_READ_FAILED: &str = "SENSOR_READ_FAILED";
pub const CDEV_WRITE_FAILED: &str = "CDEV_WRITE_FAILED";
pub const CDEV_NOT_FOUND: &str = "CDEV_NOT_FOUND";
pub const ZERO_WEIGHT: &str = "ZERO_WEIGHT";
pub const POWER_HINT_UNAVAILABLE: &str = "POWER_HINT_UNAVAILABLE";
pub const POWER_HINT_FAILED: &str = "POWER_HINT_FAILED";
pub const WATCHER_ERROR: &str = "WATCHER_ERROR";
pub const BINDING_FAILED: &str = "BINDING_FAILED";
