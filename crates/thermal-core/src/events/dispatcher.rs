//! Synchronous event dispatch to registered handlers.

use std::sync::Arc;

use super::handler::ThermalEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ThermalEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ThermalEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not keep later handlers from
    /// receiving the event; delivery is never retried.
    fn emit<F: Fn(&dyn ThermalEventHandler)>(&self, name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event = name, "event handler panicked");
            }
        }
    }

    pub fn emit_severity_changed(&self, event: &SeverityChangedEvent) {
        self.emit("severity_changed", |h| h.on_severity_changed(event));
    }

    pub fn emit_cooling_device_updated(&self, event: &CoolingDeviceUpdatedEvent) {
        self.emit("cooling_device_updated", |h| {
            h.on_cooling_device_updated(event)
        });
    }

    pub fn emit_power_hint_sent(&self, event: &PowerHintSentEvent) {
        self.emit("power_hint_sent", |h| h.on_power_hint_sent(event));
    }

    pub fn emit_tick_complete(&self, event: &TickCompleteEvent) {
        self.emit("tick_complete", |h| h.on_tick_complete(event));
    }

    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit("error", |h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
