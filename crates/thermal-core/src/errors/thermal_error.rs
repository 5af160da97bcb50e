//! Aggregate error and per-tick non-fatal error collection.

use super::error_code::ThermalErrorCode;
use super::{
    AllocationError, CdevError, ConfigError, IoError, PowerHintError, SensorError,
    WatcherError,
};

/// Any error raised by the thermal engine.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ThermalError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Cooling device error: {0}")]
    Cdev(#[from] CdevError),

    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Power hint error: {0}")]
    PowerHint(#[from] PowerHintError),

    #[error("Watcher error: {0}")]
    Watcher(#[from] WatcherError),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl ThermalErrorCode for ThermalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Sensor(e) => e.error_code(),
            Self::Cdev(e) => e.error_code(),
            Self::Allocation(e) => e.error_code(),
            Self::PowerHint(e) => e.error_code(),
            Self::Watcher(e) => e.error_code(),
            Self::Io(e) => e.error_code(),
        }
    }
}

pub type ThermalResult<T> = Result<T, ThermalError>;

/// Outcome of one evaluation pass that accumulates non-fatal errors.
/// A failing sensor or device never stops the sweep; its error lands here.
#[derive(Debug, Default)]
pub struct TickReport<T: Default = ()> {
    /// The pass result.
    pub data: T,
    /// Non-fatal errors collected during the pass.
    pub errors: Vec<ThermalError>,
}

impl<T: Default> TickReport<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the report.
    pub fn add_error(&mut self, error: impl Into<ThermalError>) {
        self.errors.push(error.into());
    }

    /// Returns true if the pass raised no errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
