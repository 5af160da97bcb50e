//! Error handling for the thermal engine.
//! One error enum per subsystem, `thiserror` only.

pub mod allocation_error;
pub mod cdev_error;
pub mod config_error;
pub mod error_code;
pub mod io_error;
pub mod power_hint_error;
pub mod sensor_error;
pub mod thermal_error;
pub mod watcher_error;

pub use allocation_error::AllocationError;
pub use cdev_error::CdevError;
pub use config_error::ConfigError;
pub use error_code::ThermalErrorCode;
pub use io_error::IoError;
pub use power_hint_error::PowerHintError;
pub use sensor_error::SensorError;
pub use thermal_error::{ThermalError, ThermalResult, TickReport};
pub use watcher_error::WatcherError;
