//! Span definitions for the evaluation pass.

/// Span around one evaluation pass.
#[macro_export]
macro_rules! tick_span {
    ($event_count:expr) => {
        tracing::debug_span!("thermal.tick", events = $event_count)
    };
}

/// Span around one sensor's evaluation inside a pass.
#[macro_export]
macro_rules! sensor_span {
    ($sensor:expr) => {
        tracing::debug_span!("thermal.sensor", sensor = %$sensor)
    };
}

