//! ThermalEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for consuming thermal engine events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. Handlers are called from the
/// evaluation thread and must not block it.
pub trait ThermalEventHandler: Send + Sync {
    fn on_severity_changed(&self, _event: &SeverityChangedEvent) {}
    fn on_cooling_device_updated(&self, _event: &CoolingDeviceUpdatedEvent) {}
    fn on_power_hint_sent(&self, _event: &PowerHintSentEvent) {}
    fn on_tick_complete(&self, _event: &TickCompleteEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
