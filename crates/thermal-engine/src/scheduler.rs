//! The evaluation pass and its adaptive sleep interval.
//!
//! One `tick` visits every monitored sensor. A sensor is evaluated when its
//! interval has elapsed or when the event set names it (a virtual sensor is
//! named by its trigger sensor). The pass returns how long the caller may
//! sleep before the next one, never less than the configured floor.

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use thermal_core::errors::{ThermalErrorCode, TickReport};
use thermal_core::events::{
    CoolingDeviceUpdatedEvent, ErrorEvent, SeverityChangedEvent, TickCompleteEvent,
};
use thermal_core::types::SensorId;
use thermal_core::{sensor_span, tick_span, Severity, Temperature};

use crate::aggregation::AggregationTable;
use crate::allocator;
use crate::engine::ThermalEngine;
use crate::status::ControlState;
use crate::topology::SensorNode;

/// Result of one pass.
#[derive(Debug, Default)]
pub struct TickOutcome {
    /// Time until the next pass is due, clamped to the floor.
    pub wait: Duration,
    /// Sensors read and classified in this pass.
    pub evaluated: usize,
    /// Readings whose severity changed in this pass.
    pub changed: Vec<Temperature>,
    /// Cooling-device states written in this pass.
    pub writes: Vec<(String, i32)>,
}

/// Evaluation-thread state: PID controllers, requests, and the
/// aggregation table.
#[derive(Debug)]
pub struct EvaluationScheduler {
    control: Vec<ControlState>,
    aggregation: AggregationTable,
    floor: Duration,
}

impl EvaluationScheduler {
    pub fn new(engine: &ThermalEngine) -> Self {
        let topology = engine.topology();
        Self {
            control: topology.sensors().iter().map(ControlState::for_sensor).collect(),
            aggregation: AggregationTable::new(topology),
            floor: engine.config().watcher.effective_min_poll_interval(),
        }
    }

    pub fn aggregation(&self) -> &AggregationTable {
        &self.aggregation
    }

    pub fn control(&self, id: SensorId) -> &ControlState {
        &self.control[id.index()]
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// Run one pass at `now` with the set of notified sensor names.
    pub fn tick(
        &mut self,
        engine: &ThermalEngine,
        events: &FxHashSet<String>,
        now: Instant,
    ) -> TickReport<TickOutcome> {
        let _tick = tick_span!(events.len()).entered();
        let mut report = TickReport::new(TickOutcome::default());
        let mut min_wait = Duration::MAX;
        let mut changed: Vec<(SensorId, Severity, Temperature)> = Vec::new();

        for node in engine.topology().sensors() {
            if !node.info.monitor {
                continue;
            }
            let id = node.id;
            let interval = node.interval_for(engine.status().get(id).severity);
            let elapsed = self.control[id.index()]
                .last_update
                .map(|t| now.saturating_duration_since(t));
            let triggered = events.contains(node.info.trigger_name());

            let elapsed = match elapsed {
                Some(e) if e < interval && !triggered => {
                    min_wait = min_wait.min(interval - e);
                    continue;
                }
                other => other.unwrap_or_default(),
            };

            let _sensor = sensor_span!(node.info.name).entered();
            let (temperature, pair) = match engine.evaluate_sensor(id) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "sensor read failed, skipped");
                    report.add_error(e);
                    min_wait = min_wait.min(interval);
                    continue;
                }
            };

            let severity = temperature.throttling_status;
            let previous = engine.status().update(id, |s| {
                let previous = s.severity;
                s.prev_hot = pair.hot;
                s.prev_cold = pair.cold;
                s.severity = severity;
                previous
            });
            if severity.is_none() {
                tracing::debug!(value = temperature.value, "reading");
            } else {
                tracing::info!(value = temperature.value, %severity, "reading above threshold");
            }
            if previous != severity {
                report.data.changed.push(temperature.clone());
                changed.push((id, previous, temperature.clone()));
            }

            self.update_requests(engine, node, severity, temperature.value, elapsed, &mut report);

            self.control[id.index()].last_update = Some(now);
            min_wait = min_wait.min(node.interval_for(severity));
            report.data.evaluated += 1;
        }

        self.apply_writes(engine, &mut report);
        Self::notify(engine, changed, &mut report);

        report.data.wait = min_wait.max(self.floor);
        for e in &report.errors {
            engine.dispatcher().emit_error(&ErrorEvent {
                message: e.to_string(),
                error_code: e.error_code().to_string(),
            });
        }
        engine.dispatcher().emit_tick_complete(&TickCompleteEvent {
            evaluated: report.data.evaluated,
            min_wait_ms: u64::try_from(report.data.wait.as_millis()).unwrap_or(u64::MAX),
            error_count: report.error_count(),
        });
        report
    }

    fn update_requests(
        &mut self,
        engine: &ThermalEngine,
        node: &SensorNode,
        severity: Severity,
        value: f64,
        elapsed: Duration,
        report: &mut TickReport<TickOutcome>,
    ) {
        let Some(throttling) = &node.info.throttling else {
            return;
        };
        let control = &mut self.control[node.id.index()];

        if !node.pid_cdevs.is_empty() {
            let out = control
                .pid
                .step(&node.info.hot_thresholds, throttling, severity, value, elapsed);
            if let Err(e) = allocator::allocate_by_power(
                engine.topology(),
                node,
                out.budget,
                &mut control.pid_requests,
            ) {
                tracing::warn!(error = %e, "power allocation skipped");
                report.add_error(e);
            }
        }
        if !node.limit_cdevs.is_empty() {
            allocator::allocate_by_severity(node, severity, &mut control.limit_requests);
        }

        for cdev in &node.cdevs {
            let request = control.combined_request(node, *cdev);
            self.aggregation.submit(*cdev, node.id, request);
        }
    }

    fn apply_writes(&mut self, engine: &ThermalEngine, report: &mut TickReport<TickOutcome>) {
        for (cdev, state) in self.aggregation.take_pending() {
            let name = engine.topology().cdev(cdev).info.name.clone();
            let previous_state = self.aggregation.applied(cdev);
            match engine.write_cooling_device(cdev, state) {
                Ok(()) => {
                    self.aggregation.mark_applied(cdev, state);
                    tracing::info!(cdev = %name, state, "cooling device updated");
                    engine
                        .dispatcher()
                        .emit_cooling_device_updated(&CoolingDeviceUpdatedEvent {
                            cdev: name.clone(),
                            previous_state,
                            state,
                        });
                    report.data.writes.push((name, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "cooling device write failed");
                    report.add_error(e);
                }
            }
        }
    }

    fn notify(
        engine: &ThermalEngine,
        changed: Vec<(SensorId, Severity, Temperature)>,
        report: &mut TickReport<TickOutcome>,
    ) {
        for (id, previous, temperature) in changed {
            let info = &engine.topology().sensor(id).info;
            let severity = temperature.throttling_status;
            if info.send_callback {
                engine.dispatcher().emit_severity_changed(&SeverityChangedEvent {
                    temperature,
                    previous,
                });
            }
            if info.send_power_hint {
                if let Err(e) = engine.update_power_hint(id, severity) {
                    tracing::warn!(sensor = %info.name, error = %e, "power hint not sent");
                    report.add_error(e);
                }
            }
        }
    }
}
