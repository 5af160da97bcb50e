//! The engine facade: topology, collaborators, shared severity state, and
//! the query surface.
//!
//! Queries may run on any thread concurrently with the evaluation pass;
//! they only take the severity read lock.

use std::sync::Arc;

use thermal_core::config::EngineConfig;
use thermal_core::errors::{CdevError, PowerHintError, SensorError};
use thermal_core::events::{EventDispatcher, PowerHintSentEvent, ThermalEventHandler};
use thermal_core::tracing::init_tracing_with_filter;
use thermal_core::traits::{PowerHintService, RawIo};
use thermal_core::types::{
    CdevId, CoolingDevice, CoolingType, SensorId, SensorType, Temperature, TemperatureThreshold,
};
use thermal_core::{Severity, ThermalDefinitions, ThermalResult};

use crate::classifier::{classify, SeverityPair, ThresholdView};
use crate::power_hint::{PowerHintBridge, SupportTable};
use crate::status::StatusTable;
use crate::topology::{SensorNode, ThermalTopology};
use crate::virtual_sensor;

pub struct ThermalEngine {
    config: EngineConfig,
    topology: ThermalTopology,
    io: Arc<dyn RawIo>,
    status: StatusTable,
    dispatcher: EventDispatcher,
    power_hints: Option<PowerHintBridge>,
    hint_support: Vec<SupportTable>,
}

impl std::fmt::Debug for ThermalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThermalEngine")
            .field("sensors", &self.topology.sensor_count())
            .field("cooling_devices", &self.topology.cdev_count())
            .field("dispatcher", &self.dispatcher)
            .field("power_hints", &self.power_hints)
            .finish()
    }
}

impl ThermalEngine {
    /// Validate `defs` and build the engine. Any integrity failure is fatal.
    ///
    /// Installs tracing with the configured fallback filter unless a
    /// subscriber is already in place.
    pub fn new(
        defs: &ThermalDefinitions,
        config: EngineConfig,
        io: Arc<dyn RawIo>,
    ) -> ThermalResult<Self> {
        init_tracing_with_filter(config.logging.effective_filter());
        EngineConfig::validate(&config)?;
        defs.validate()?;
        let topology = ThermalTopology::build(defs, &config.watcher)?;
        tracing::info!(
            sensors = topology.sensor_count(),
            cooling_devices = topology.cdev_count(),
            "thermal engine initialized"
        );
        let n = topology.sensor_count();
        Ok(Self {
            config,
            status: StatusTable::new(n),
            hint_support: vec![[Severity::None; thermal_core::constants::SEVERITY_COUNT]; n],
            topology,
            io,
            dispatcher: EventDispatcher::new(),
            power_hints: None,
        })
    }

    pub fn register_handler(&mut self, handler: Arc<dyn ThermalEventHandler>) {
        self.dispatcher.register(handler);
    }

    /// Attach the power-hint service and query support for every sensor
    /// that sends hints. Does nothing when hints are disabled in config.
    pub fn connect_power_hints(&mut self, service: Arc<dyn PowerHintService>) {
        if !self.config.power_hint.effective_enabled() {
            tracing::info!("power hints disabled by configuration");
            return;
        }
        let bridge = PowerHintBridge::new(service);
        for node in self.topology.sensors() {
            if node.info.send_power_hint {
                let table = bridge.query_support(&node.info.name);
                tracing::debug!(sensor = %node.info.name, ?table, "power hint support");
                self.hint_support[node.id.index()] = table;
            }
        }
        self.power_hints = Some(bridge);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn topology(&self) -> &ThermalTopology {
        &self.topology
    }

    pub fn status(&self) -> &StatusTable {
        &self.status
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn power_hints(&self) -> Option<&PowerHintBridge> {
        self.power_hints.as_ref()
    }

    pub fn hint_support(&self, id: SensorId) -> &SupportTable {
        &self.hint_support[id.index()]
    }

    /// Scaled reading of one sensor.
    pub fn read_value(&self, node: &SensorNode) -> Result<f64, SensorError> {
        let name = node.info.name.as_str();
        let raw = match &node.info.virtual_sensor {
            Some(v) => virtual_sensor::evaluate(name, v, self.io.as_ref())?,
            None => {
                let text = self.io.read_value(name).map_err(|e| SensorError::ReadFailed {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
                virtual_sensor::parse_reading(name, &text)?
            }
        };
        Ok(raw * node.info.multiplier)
    }

    /// Read and classify one sensor against its stored previous severities.
    /// Nothing is written back.
    pub fn evaluate_sensor(&self, id: SensorId) -> Result<(Temperature, SeverityPair), SensorError> {
        let node = self.topology.sensor(id);
        let value = self.read_value(node)?;
        let previous = self.status.get(id).previous();
        let pair = classify(&ThresholdView::from(&node.info), previous, value);
        let temperature = Temperature {
            name: node.info.name.clone(),
            sensor_type: node.info.sensor_type,
            value,
            throttling_status: pair.status(),
        };
        Ok((temperature, pair))
    }

    fn sensor_id(&self, name: &str) -> Result<SensorId, SensorError> {
        self.topology.sensor_id(name).ok_or_else(|| SensorError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn read_temperature(&self, name: &str) -> ThermalResult<Temperature> {
        let id = self.sensor_id(name)?;
        Ok(self.evaluate_sensor(id)?.0)
    }

    /// Readings of every sensor, optionally filtered by type. Fails if any
    /// selected sensor cannot be read.
    pub fn current_temperatures(&self, filter: Option<SensorType>) -> ThermalResult<Vec<Temperature>> {
        self.topology
            .sensors()
            .iter()
            .filter(|n| filter.map_or(true, |t| n.info.sensor_type == t))
            .map(|n| Ok(self.evaluate_sensor(n.id)?.0))
            .collect()
    }

    pub fn temperature_thresholds(&self, filter: Option<SensorType>) -> Vec<TemperatureThreshold> {
        self.topology
            .sensors()
            .iter()
            .filter(|n| filter.map_or(true, |t| n.info.sensor_type == t))
            .map(|n| TemperatureThreshold {
                name: n.info.name.clone(),
                sensor_type: n.info.sensor_type,
                hot_thresholds: n.info.hot_thresholds,
                cold_thresholds: n.info.cold_thresholds,
                vr_threshold: n.info.vr_threshold,
            })
            .collect()
    }

    /// Current state of every cooling device as read back from I/O.
    pub fn current_cooling_devices(
        &self,
        filter: Option<CoolingType>,
    ) -> ThermalResult<Vec<CoolingDevice>> {
        let mut out = Vec::new();
        for node in self.topology.cdevs() {
            if filter.is_some_and(|t| node.info.cdev_type != t) {
                continue;
            }
            let name = &node.info.name;
            let read_failed = |reason: String| CdevError::ReadFailed {
                name: name.clone(),
                reason,
            };
            let raw = self
                .io
                .read_value(name)
                .map_err(|e| read_failed(e.to_string()))?;
            let value = raw
                .trim()
                .parse::<i64>()
                .map_err(|e| read_failed(e.to_string()))?;
            out.push(CoolingDevice {
                name: name.clone(),
                cdev_type: node.info.cdev_type,
                value,
            });
        }
        Ok(out)
    }

    /// Last severity the evaluation pass recorded for `name`.
    pub fn sensor_severity(&self, name: &str) -> ThermalResult<Severity> {
        let id = self.sensor_id(name)?;
        Ok(self.status.get(id).severity)
    }

    pub(crate) fn write_cooling_device(&self, id: CdevId, state: i32) -> Result<(), CdevError> {
        let name = &self.topology.cdev(id).info.name;
        self.io
            .write_value(name, &state.to_string())
            .map_err(|e| CdevError::WriteFailed {
                name: name.clone(),
                state: i64::from(state),
                reason: e.to_string(),
            })
    }

    /// Forward a severity change of `id` to the power-hint service.
    ///
    /// The stored hint severity only advances when the transition succeeds.
    pub(crate) fn update_power_hint(&self, id: SensorId, severity: Severity) -> Result<(), PowerHintError> {
        let Some(bridge) = &self.power_hints else {
            return Ok(());
        };
        let next = self.hint_support[id.index()][severity.index()];
        let previous = self.status.get(id).prev_hint;
        if previous == next {
            return Ok(());
        }
        let node = self.topology.sensor(id);
        let sent = bridge.transition(&node.info.name, previous, next)?;
        self.status.update(id, |s| s.prev_hint = next);
        for (hint, enable) in sent {
            tracing::info!(%hint, enable, "power hint sent");
            self.dispatcher
                .emit_power_hint_sent(&PowerHintSentEvent { hint, enable });
        }
        Ok(())
    }
}
