//! Arena of sensors and cooling devices with name lookup built once.
//!
//! Names are resolved to [`SensorId`]/[`CdevId`] at startup so the
//! evaluation pass works on indices only.

use std::time::Duration;

use rustc_hash::FxHashMap;
use thermal_core::config::{ThermalDefinitions, WatcherConfig};
use thermal_core::constants::SEVERITY_COUNT;
use thermal_core::errors::ConfigError;
use thermal_core::types::collections::SmallVec8;
use thermal_core::types::{CdevId, CdevInfo, SensorId, SensorInfo};
use thermal_core::Severity;

/// A sensor with its cooling-device references resolved to arena indices.
#[derive(Debug, Clone)]
pub struct SensorNode {
    pub id: SensorId,
    pub info: SensorInfo,
    pub polling_delay: Duration,
    pub passive_delay: Duration,
    /// Devices driven by the power allocator, with weights.
    pub pid_cdevs: SmallVec8<(CdevId, f64)>,
    /// Devices driven by the hard-limit table, with per-severity states.
    pub limit_cdevs: SmallVec8<(CdevId, [i32; SEVERITY_COUNT])>,
    /// Union of `pid_cdevs` and `limit_cdevs`, in declaration order.
    pub cdevs: SmallVec8<CdevId>,
}

impl SensorNode {
    /// Evaluation interval for a sensor currently at `severity`.
    pub fn interval_for(&self, severity: Severity) -> Duration {
        if severity.is_none() {
            self.polling_delay
        } else {
            self.passive_delay
        }
    }
}

/// A cooling device and the sensors declared to request it.
#[derive(Debug, Clone)]
pub struct CdevNode {
    pub id: CdevId,
    pub info: CdevInfo,
    pub requesters: SmallVec8<SensorId>,
}

/// Immutable sensor and cooling-device arena.
#[derive(Debug, Clone)]
pub struct ThermalTopology {
    sensors: Vec<SensorNode>,
    cdevs: Vec<CdevNode>,
    sensor_index: FxHashMap<String, SensorId>,
    cdev_index: FxHashMap<String, CdevId>,
}

impl ThermalTopology {
    /// Resolve definitions into the arena.
    ///
    /// Fails with [`ConfigError::UnknownCoolingDevice`] when a sensor
    /// references a device that was never declared.
    pub fn build(defs: &ThermalDefinitions, watcher: &WatcherConfig) -> Result<Self, ConfigError> {
        let mut cdev_index = FxHashMap::default();
        let mut cdevs = Vec::with_capacity(defs.cooling_devices.len());
        for (i, info) in defs.cooling_devices.iter().enumerate() {
            let id = CdevId::new(i);
            cdev_index.insert(info.name.clone(), id);
            cdevs.push(CdevNode {
                id,
                info: info.clone(),
                requesters: SmallVec8::new(),
            });
        }

        let lookup = |sensor: &SensorInfo, name: &str| {
            cdev_index
                .get(name)
                .copied()
                .ok_or_else(|| ConfigError::UnknownCoolingDevice {
                    sensor: sensor.name.clone(),
                    cdev: name.to_string(),
                })
        };

        let min_poll = watcher.effective_min_poll_interval();
        let mut sensor_index = FxHashMap::default();
        let mut sensors = Vec::with_capacity(defs.sensors.len());
        for (i, info) in defs.sensors.iter().enumerate() {
            let id = SensorId::new(i);
            let mut pid_cdevs = SmallVec8::new();
            let mut limit_cdevs = SmallVec8::new();
            let mut node_cdevs: SmallVec8<CdevId> = SmallVec8::new();

            if let Some(t) = &info.throttling {
                for req in &t.cdev_request {
                    let cdev = lookup(info, &req.cdev)?;
                    pid_cdevs.push((cdev, req.weight));
                    if !node_cdevs.contains(&cdev) {
                        node_cdevs.push(cdev);
                    }
                }
                for (name, table) in &t.limit_info {
                    let cdev = lookup(info, name)?;
                    limit_cdevs.push((cdev, *table));
                    if !node_cdevs.contains(&cdev) {
                        node_cdevs.push(cdev);
                    }
                }
            }

            // Sensors without asynchronous notifications fall back to the
            // minimum poll interval in every state.
            let (polling_delay, passive_delay) =
                if info.monitor && !info.is_virtual() && !info.supports_notification {
                    (min_poll, min_poll)
                } else {
                    (
                        info.polling_delay_ms
                            .map(Duration::from_millis)
                            .unwrap_or_else(|| watcher.effective_polling_delay()),
                        info.passive_delay_ms
                            .map(Duration::from_millis)
                            .unwrap_or_else(|| watcher.effective_passive_delay()),
                    )
                };

            for cdev in &node_cdevs {
                cdevs[cdev.index()].requesters.push(id);
            }
            sensor_index.insert(info.name.clone(), id);
            sensors.push(SensorNode {
                id,
                info: info.clone(),
                polling_delay,
                passive_delay,
                pid_cdevs,
                limit_cdevs,
                cdevs: node_cdevs,
            });
        }

        Ok(Self {
            sensors,
            cdevs,
            sensor_index,
            cdev_index,
        })
    }

    pub fn sensors(&self) -> &[SensorNode] {
        &self.sensors
    }

    pub fn cdevs(&self) -> &[CdevNode] {
        &self.cdevs
    }

    pub fn sensor(&self, id: SensorId) -> &SensorNode {
        &self.sensors[id.index()]
    }

    pub fn cdev(&self, id: CdevId) -> &CdevNode {
        &self.cdevs[id.index()]
    }

    pub fn sensor_id(&self, name: &str) -> Option<SensorId> {
        self.sensor_index.get(name).copied()
    }

    pub fn cdev_id(&self, name: &str) -> Option<CdevId> {
        self.cdev_index.get(name).copied()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn cdev_count(&self) -> usize {
        self.cdevs.len()
    }
}
