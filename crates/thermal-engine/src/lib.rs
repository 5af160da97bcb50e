//! # thermal-engine
//!
//! The sensor/cooling-device control engine: threshold classification with
//! hysteresis, PID power budgeting, cooling-device request allocation and
//! max-wins aggregation, the adaptive evaluation scheduler, and the bridge
//! to the platform power-hint service.

pub mod aggregation;
pub mod allocator;
pub mod classifier;
pub mod engine;
pub mod files;
pub mod pid;
pub mod power_hint;
pub mod scheduler;
pub mod status;
pub mod topology;
pub mod virtual_sensor;
pub mod watcher;

pub use aggregation::AggregationTable;
pub use classifier::{classify, SeverityPair, ThresholdView};
pub use engine::ThermalEngine;
pub use files::ThermalFiles;
pub use pid::{PidOutput, PidState};
pub use power_hint::{PowerHintBridge, SupportTable};
pub use scheduler::{EvaluationScheduler, TickOutcome};
pub use topology::ThermalTopology;
pub use watcher::{ThermalWatcher, WatcherHandle};
