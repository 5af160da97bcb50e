//! # thermal-core
//!
//! Foundation crate for the thermal control engine.
//! Defines the severity scale, sensor and cooling-device definitions,
//! errors, config, events, tracing setup, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod severity;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{EngineConfig, ThermalDefinitions};
pub use errors::{ThermalError, ThermalResult};
pub use severity::Severity;
pub use types::{CdevInfo, SensorInfo, Temperature, ThrottlingArray, ThrottlingInfo};
