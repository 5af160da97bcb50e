//! Configuration errors. All of them are fatal at startup.

use super::error_code::{self, ThermalErrorCode};

/// Errors that can occur while loading and validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Sensor {sensor} references undeclared cooling device {cdev}")]
    UnknownCoolingDevice { sensor: String, cdev: String },

    #[error("Virtual sensor {sensor} links undeclared sensor {linked}")]
    UnknownLinkedSensor { sensor: String, linked: String },

    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },
}

impl ThermalErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCoolingDevice { .. } | Self::UnknownLinkedSensor { .. } => {
                error_code::CONFIG_INTEGRITY
            }
            _ => error_code::CONFIG_ERROR,
        }
    }
}
