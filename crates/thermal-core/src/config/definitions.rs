//! Sensor and cooling-device definitions loaded once at startup.
//!
//! # Examples
//!
//! ```
//! use thermal_core::config::ThermalDefinitions;
//!
//! let defs = ThermalDefinitions::from_json(r#"{
//!     "sensors": [{ "name": "skin", "type": "SKIN", "monitor": true,
//!                   "hot_thresholds": [null, null, 35, 45, 55, 65, 85] }],
//!     "cooling_devices": []
//! }"#).unwrap();
//! assert_eq!(defs.sensors.len(), 1);
//! ```

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_LINKED_SENSORS;
use crate::errors::ConfigError;
use crate::severity::Severity;
use crate::types::{CdevInfo, SensorInfo, ThrottlingInfo};

/// The full sensor and cooling-device tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThermalDefinitions {
    #[serde(default)]
    pub sensors: Vec<SensorInfo>,
    #[serde(default)]
    pub cooling_devices: Vec<CdevInfo>,
}

impl ThermalDefinitions {
    /// Read, parse, and validate a definitions file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let defs: Self = serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        defs.validate()?;
        Ok(defs)
    }

    /// Parse and validate definitions from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let defs: Self = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        defs.validate()?;
        Ok(defs)
    }

    /// Check referential integrity and per-field constraints.
    ///
    /// A sensor that references an undeclared cooling device is a fatal
    /// [`ConfigError::UnknownCoolingDevice`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut cdev_names = FxHashSet::default();
        for cdev in &self.cooling_devices {
            if !cdev_names.insert(cdev.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    kind: "cooling device",
                    name: cdev.name.clone(),
                });
            }
            if cdev.power_to_state.windows(2).any(|w| w[1] > w[0]) {
                tracing::warn!(
                    cdev = %cdev.name,
                    "power curve rises with state; larger budgets select more restrictive states"
                );
            }
        }

        let mut sensor_names = FxHashSet::default();
        for sensor in &self.sensors {
            if !sensor_names.insert(sensor.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    kind: "sensor",
                    name: sensor.name.clone(),
                });
            }
        }

        for sensor in &self.sensors {
            if !sensor.multiplier.is_finite() || sensor.multiplier == 0.0 {
                return Err(invalid(
                    format!("sensors.{}.multiplier", sensor.name),
                    "must be finite and non-zero",
                ));
            }
            if sensor.polling_delay_ms == Some(0) || sensor.passive_delay_ms == Some(0) {
                return Err(invalid(
                    format!("sensors.{}.delay", sensor.name),
                    "must be greater than 0",
                ));
            }

            if let Some(v) = &sensor.virtual_sensor {
                if v.linked_sensors.is_empty() || v.linked_sensors.len() > MAX_LINKED_SENSORS {
                    return Err(invalid(
                        format!("sensors.{}.virtual_sensor.linked_sensors", sensor.name),
                        &format!("must list 1..={MAX_LINKED_SENSORS} sources"),
                    ));
                }
                for linked in &v.linked_sensors {
                    if !sensor_names.contains(linked.name.as_str()) {
                        return Err(ConfigError::UnknownLinkedSensor {
                            sensor: sensor.name.clone(),
                            linked: linked.name.clone(),
                        });
                    }
                }
            }

            if let Some(t) = &sensor.throttling {
                for cdev in t.referenced_cdevs() {
                    if !cdev_names.contains(cdev) {
                        return Err(ConfigError::UnknownCoolingDevice {
                            sensor: sensor.name.clone(),
                            cdev: cdev.to_string(),
                        });
                    }
                }
                validate_throttling(sensor, t)?;
            }
        }
        Ok(())
    }

    pub fn sensor(&self, name: &str) -> Option<&SensorInfo> {
        self.sensors.iter().find(|s| s.name == name)
    }

    pub fn cooling_device(&self, name: &str) -> Option<&CdevInfo> {
        self.cooling_devices.iter().find(|c| c.name == name)
    }
}

fn validate_throttling(sensor: &SensorInfo, t: &ThrottlingInfo) -> Result<(), ConfigError> {
    for w in &t.cdev_request {
        if !w.weight.is_finite() || w.weight < 0.0 {
            return Err(invalid(
                format!("sensors.{}.throttling.cdev_request.{}", sensor.name, w.cdev),
                "weight must be finite and non-negative",
            ));
        }
    }

    for level in t.pid_levels() {
        let i = level.index();
        if level == Severity::None || sensor.hot_thresholds[i].is_nan() {
            return Err(invalid(
                format!("sensors.{}.throttling.throttle_type[{level}]", sensor.name),
                "PID level needs a configured hot threshold above NONE",
            ));
        }
        let gains = [
            ("k_po", t.k_po[i]),
            ("k_pu", t.k_pu[i]),
            ("k_i", t.k_i[i]),
            ("k_d", t.k_d[i]),
            ("i_max", t.i_max[i]),
            ("i_cutoff", t.i_cutoff[i]),
            ("s_power", t.s_power[i]),
            ("min_alloc_power", t.min_alloc_power[i]),
            ("max_alloc_power", t.max_alloc_power[i]),
        ];
        if let Some((field, _)) = gains.iter().find(|(_, v)| v.is_nan()) {
            return Err(invalid(
                format!("sensors.{}.throttling.{field}[{level}]", sensor.name),
                "must be set for a PID level",
            ));
        }
    }
    Ok(())
}

fn invalid(field: String, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field,
        message: message.to_string(),
    }
}
