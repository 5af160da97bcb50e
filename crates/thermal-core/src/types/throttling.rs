//! Per-severity throttling configuration: PID gains and hard-limit tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::SEVERITY_COUNT;
use crate::severity::Severity;

/// One value per severity level. NaN marks a level as not configured.
pub type ThrottlingArray = [f64; SEVERITY_COUNT];

/// How a sensor throttles at a given severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThrottleType {
    #[default]
    None,
    Pid,
    Limit,
}

/// A cooling device a sensor may drive through the power allocator,
/// with its share of the sensor's power budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdevWeight {
    pub cdev: String,
    pub weight: f64,
}

/// Throttling block of a sensor definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottlingInfo {
    #[serde(default)]
    pub throttle_type: [ThrottleType; SEVERITY_COUNT],
    /// Proportional gain when the value is above the target threshold.
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub k_po: ThrottlingArray,
    /// Proportional gain when the value is below the target threshold.
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub k_pu: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub k_i: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub k_d: ThrottlingArray,
    /// Upper bound on the magnitude of the integral term.
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub i_max: ThrottlingArray,
    /// Error must be below this for the integral to accumulate.
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub i_cutoff: ThrottlingArray,
    /// Static power added to every PID budget.
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub s_power: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub min_alloc_power: ThrottlingArray,
    #[serde(with = "nan_array", default = "nan_array::unset")]
    pub max_alloc_power: ThrottlingArray,
    /// Cooling devices driven by the PID power allocator.
    #[serde(default)]
    pub cdev_request: Vec<CdevWeight>,
    /// Hard-limit table: cooling device -> requested state per severity.
    #[serde(default)]
    pub limit_info: BTreeMap<String, [i32; SEVERITY_COUNT]>,
}

impl Default for ThrottlingInfo {
    fn default() -> Self {
        Self {
            throttle_type: [ThrottleType::None; SEVERITY_COUNT],
            k_po: nan_array::unset(),
            k_pu: nan_array::unset(),
            k_i: nan_array::unset(),
            k_d: nan_array::unset(),
            i_max: nan_array::unset(),
            i_cutoff: nan_array::unset(),
            s_power: nan_array::unset(),
            min_alloc_power: nan_array::unset(),
            max_alloc_power: nan_array::unset(),
            cdev_request: Vec::new(),
            limit_info: BTreeMap::new(),
        }
    }
}

impl ThrottlingInfo {
    pub fn throttle_type_at(&self, severity: Severity) -> ThrottleType {
        self.throttle_type[severity.index()]
    }

    /// Levels configured for PID control, ascending.
    pub fn pid_levels(&self) -> impl Iterator<Item = Severity> + '_ {
        Severity::ALL
            .into_iter()
            .filter(|s| self.throttle_type_at(*s) == ThrottleType::Pid)
    }

    /// Names of every cooling device this block references.
    pub fn referenced_cdevs(&self) -> impl Iterator<Item = &str> {
        self.cdev_request
            .iter()
            .map(|r| r.cdev.as_str())
            .chain(self.limit_info.keys().map(String::as_str))
    }
}

/// Serde adapter for [`ThrottlingArray`]: `null` entries become NaN and
/// NaN entries serialize back to `null`.
pub mod nan_array {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ThrottlingArray;
    use crate::constants::SEVERITY_COUNT;

    pub fn serialize<S: Serializer>(values: &ThrottlingArray, s: S) -> Result<S::Ok, S::Error> {
        let entries: [Option<f64>; SEVERITY_COUNT] =
            values.map(|v| if v.is_nan() { None } else { Some(v) });
        entries.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ThrottlingArray, D::Error> {
        let entries = <[Option<f64>; SEVERITY_COUNT]>::deserialize(d)?;
        Ok(entries.map(|v| v.unwrap_or(f64::NAN)))
    }

    /// Every level unset.
    pub fn unset() -> ThrottlingArray {
        [f64::NAN; SEVERITY_COUNT]
    }

    /// Every level zero.
    pub fn zeros() -> ThrottlingArray {
        [0.0; SEVERITY_COUNT]
    }
}
