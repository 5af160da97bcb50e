//! Event payload types.

use crate::severity::Severity;
use crate::types::Temperature;

/// Payload for `on_severity_changed`.
#[derive(Debug, Clone)]
pub struct SeverityChangedEvent {
    pub temperature: Temperature,
    pub previous: Severity,
}

/// Payload for `on_cooling_device_updated`.
#[derive(Debug, Clone)]
pub struct CoolingDeviceUpdatedEvent {
    pub cdev: String,
    pub previous_state: Option<i32>,
    pub state: i32,
}

/// Payload for `on_power_hint_sent`.
#[derive(Debug, Clone)]
pub struct PowerHintSentEvent {
    pub hint: String,
    pub enable: bool,
}

/// Payload for `on_tick_complete`.
#[derive(Debug, Clone)]
pub struct TickCompleteEvent {
    pub evaluated: usize,
    pub min_wait_ms: u64,
    pub error_count: usize,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
