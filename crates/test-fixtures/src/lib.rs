//! Test fixtures for the thermal workspace: JSON definition files, sensor
//! and cooling-device builders, and in-memory collaborators.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thermal_core::errors::{IoError, PowerHintError};
use thermal_core::events::*;
use thermal_core::traits::{PowerHintService, RawIo};
use thermal_core::types::{
    nan_array, CdevInfo, CdevWeight, CoolingType, Formula, LinkedSensor, SensorInfo, SensorType,
    ThrottleType, ThrottlingArray, ThrottlingInfo, VirtualSensorInfo,
};
use thermal_core::{Severity, ThermalDefinitions};

// ---------------------------------------------------------------------------
// Fixture files
// ---------------------------------------------------------------------------

/// Absolute path of a file under this crate's `data/` directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(relative_path)
}

/// Load and validate a definitions fixture.
///
/// # Panics
/// Panics if the file doesn't exist or fails validation.
pub fn load_definitions(relative_path: &str) -> ThermalDefinitions {
    let path = fixture_path(relative_path);
    ThermalDefinitions::load(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Array with `values` at LIGHT..=SHUTDOWN and NaN at NONE.
pub fn levels(values: [f64; 6]) -> ThrottlingArray {
    let mut out = nan_array::unset();
    out[1..].copy_from_slice(&values);
    out
}

/// Array with `value` at `level` and NaN elsewhere.
pub fn at(level: Severity, value: f64) -> ThrottlingArray {
    let mut out = nan_array::unset();
    out[level.index()] = value;
    out
}

/// Fluent builder for [`SensorInfo`]. Sensors are monitored and support
/// notifications unless told otherwise.
#[derive(Debug, Clone)]
pub struct SensorBuilder {
    info: SensorInfo,
}

pub fn sensor(name: &str) -> SensorBuilder {
    SensorBuilder {
        info: SensorInfo {
            name: name.to_string(),
            sensor_type: SensorType::Skin,
            hot_thresholds: nan_array::unset(),
            hot_hysteresis: nan_array::zeros(),
            cold_thresholds: nan_array::unset(),
            cold_hysteresis: nan_array::zeros(),
            vr_threshold: None,
            multiplier: 1.0,
            polling_delay_ms: Some(10_000),
            passive_delay_ms: Some(1_000),
            monitor: true,
            send_callback: false,
            send_power_hint: false,
            supports_notification: true,
            virtual_sensor: None,
            throttling: None,
        },
    }
}

impl SensorBuilder {
    pub fn kind(mut self, t: SensorType) -> Self {
        self.info.sensor_type = t;
        self
    }

    pub fn hot(mut self, thresholds: ThrottlingArray, hysteresis: ThrottlingArray) -> Self {
        self.info.hot_thresholds = thresholds;
        self.info.hot_hysteresis = hysteresis;
        self
    }

    pub fn cold(mut self, thresholds: ThrottlingArray, hysteresis: ThrottlingArray) -> Self {
        self.info.cold_thresholds = thresholds;
        self.info.cold_hysteresis = hysteresis;
        self
    }

    pub fn multiplier(mut self, m: f64) -> Self {
        self.info.multiplier = m;
        self
    }

    pub fn delays(mut self, polling_ms: u64, passive_ms: u64) -> Self {
        self.info.polling_delay_ms = Some(polling_ms);
        self.info.passive_delay_ms = Some(passive_ms);
        self
    }

    pub fn unmonitored(mut self) -> Self {
        self.info.monitor = false;
        self
    }

    pub fn callback(mut self) -> Self {
        self.info.send_callback = true;
        self
    }

    pub fn power_hint(mut self) -> Self {
        self.info.send_power_hint = true;
        self
    }

    pub fn polled(mut self) -> Self {
        self.info.supports_notification = false;
        self
    }

    pub fn virtual_of(mut self, formula: Formula, trigger: &str, linked: &[(&str, f64)]) -> Self {
        self.info.virtual_sensor = Some(VirtualSensorInfo {
            linked_sensors: linked
                .iter()
                .map(|(name, c)| LinkedSensor {
                    name: name.to_string(),
                    coefficient: Some(*c),
                })
                .collect::<SmallVec<_>>(),
            formula,
            trigger_sensor: trigger.to_string(),
        });
        self
    }

    pub fn throttling(mut self, t: ThrottlingInfo) -> Self {
        self.info.throttling = Some(t);
        self
    }

    pub fn build(self) -> SensorInfo {
        self.info
    }
}

/// PID gains at a single level.
#[derive(Debug, Clone, Copy)]
pub struct Gains {
    pub k_po: f64,
    pub k_pu: f64,
    pub k_i: f64,
    pub k_d: f64,
    pub i_max: f64,
    pub i_cutoff: f64,
    pub s_power: f64,
    pub min_alloc_power: f64,
    pub max_alloc_power: f64,
}

impl Default for Gains {
    /// Proportional-only control with a wide budget window.
    fn default() -> Self {
        Self {
            k_po: 1.0,
            k_pu: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            i_max: 0.0,
            i_cutoff: 0.0,
            s_power: 0.0,
            min_alloc_power: -1.0e9,
            max_alloc_power: 1.0e9,
        }
    }
}

/// Throttling block with PID control at `level` using `gains`.
pub fn pid_throttling(level: Severity, gains: Gains, cdevs: &[(&str, f64)]) -> ThrottlingInfo {
    let mut t = ThrottlingInfo::default();
    t.throttle_type[level.index()] = ThrottleType::Pid;
    t.k_po = at(level, gains.k_po);
    t.k_pu = at(level, gains.k_pu);
    t.k_i = at(level, gains.k_i);
    t.k_d = at(level, gains.k_d);
    t.i_max = at(level, gains.i_max);
    t.i_cutoff = at(level, gains.i_cutoff);
    t.s_power = at(level, gains.s_power);
    t.min_alloc_power = at(level, gains.min_alloc_power);
    t.max_alloc_power = at(level, gains.max_alloc_power);
    t.cdev_request = cdevs
        .iter()
        .map(|(cdev, weight)| CdevWeight {
            cdev: cdev.to_string(),
            weight: *weight,
        })
        .collect();
    t
}

/// Throttling block with hard limits at `limit_levels` for `cdev`.
pub fn limit_throttling(limit_levels: &[Severity], cdev: &str, table: [i32; 7]) -> ThrottlingInfo {
    let mut t = ThrottlingInfo::default();
    for level in limit_levels {
        t.throttle_type[level.index()] = ThrottleType::Limit;
    }
    t.limit_info.insert(cdev.to_string(), table);
    t
}

pub fn cdev(name: &str, power_to_state: &[f64]) -> CdevInfo {
    CdevInfo {
        name: name.to_string(),
        cdev_type: CoolingType::Cpu,
        power_to_state: power_to_state.to_vec(),
    }
}

pub fn definitions(sensors: Vec<SensorInfo>, cooling_devices: Vec<CdevInfo>) -> ThermalDefinitions {
    ThermalDefinitions {
        sensors,
        cooling_devices,
    }
}

// ---------------------------------------------------------------------------
// In-memory raw I/O
// ---------------------------------------------------------------------------

/// [`RawIo`] over an in-memory map with a write log and failure toggles.
#[derive(Debug, Default)]
pub struct MemoryIo {
    values: Mutex<FxHashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    failing_reads: Mutex<FxHashSet<String>>,
    failing_writes: Mutex<FxHashSet<String>>,
}

impl MemoryIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: &str, value: impl ToString) {
        self.values
            .lock()
            .unwrap()
            .insert(id.to_string(), value.to_string());
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.values.lock().unwrap().get(id).cloned()
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn writes_to(&self, id: &str) -> Vec<String> {
        self.writes()
            .into_iter()
            .filter(|(w, _)| w == id)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }

    pub fn fail_reads(&self, id: &str, fail: bool) {
        toggle(&self.failing_reads, id, fail);
    }

    pub fn fail_writes(&self, id: &str, fail: bool) {
        toggle(&self.failing_writes, id, fail);
    }
}

fn toggle(set: &Mutex<FxHashSet<String>>, id: &str, on: bool) {
    let mut set = set.lock().unwrap();
    if on {
        set.insert(id.to_string());
    } else {
        set.remove(id);
    }
}

impl RawIo for MemoryIo {
    fn read_value(&self, id: &str) -> Result<String, IoError> {
        if self.failing_reads.lock().unwrap().contains(id) {
            return Err(IoError::Failed {
                id: id.to_string(),
                reason: "injected read failure".to_string(),
            });
        }
        self.get(id).ok_or_else(|| IoError::NotFound { id: id.to_string() })
    }

    fn write_value(&self, id: &str, value: &str) -> Result<(), IoError> {
        if self.failing_writes.lock().unwrap().contains(id) {
            return Err(IoError::Failed {
                id: id.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.set(id, value);
        self.writes
            .lock()
            .unwrap()
            .push((id.to_string(), value.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake power-hint service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintCall {
    Connect,
    Probe(String),
    SetMode(String, bool),
}

/// [`PowerHintService`] that records calls and supports a fixed set of
/// modes. Failures are injected per upcoming call.
#[derive(Debug, Default)]
pub struct FakePowerHint {
    supported: FxHashSet<String>,
    calls: Mutex<Vec<HintCall>>,
    failing_connects: AtomicUsize,
    failing_set_modes: AtomicUsize,
}

impl FakePowerHint {
    pub fn supporting(modes: &[&str]) -> Self {
        Self {
            supported: modes.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HintCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the `set_mode` calls, in order.
    pub fn set_modes(&self) -> Vec<(String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HintCall::SetMode(h, e) => Some((h, e)),
                _ => None,
            })
            .collect()
    }

    pub fn connect_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == HintCall::Connect)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Fail the next `n` connection attempts.
    pub fn fail_connects(&self, n: usize) {
        self.failing_connects.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` `set_mode` calls.
    pub fn fail_set_modes(&self, n: usize) {
        self.failing_set_modes.store(n, Ordering::SeqCst);
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl PowerHintService for FakePowerHint {
    fn connect(&self) -> Result<(), PowerHintError> {
        self.calls.lock().unwrap().push(HintCall::Connect);
        if Self::take_failure(&self.failing_connects) {
            return Err(PowerHintError::Unavailable {
                reason: "injected connect failure".to_string(),
            });
        }
        Ok(())
    }

    fn is_mode_supported(&self, hint: &str) -> Result<bool, PowerHintError> {
        self.calls
            .lock()
            .unwrap()
            .push(HintCall::Probe(hint.to_string()));
        Ok(self.supported.contains(hint))
    }

    fn set_mode(&self, hint: &str, enable: bool) -> Result<(), PowerHintError> {
        self.calls
            .lock()
            .unwrap()
            .push(HintCall::SetMode(hint.to_string(), enable));
        if Self::take_failure(&self.failing_set_modes) {
            return Err(PowerHintError::CallFailed {
                hint: hint.to_string(),
                reason: "injected call failure".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recording event handler
// ---------------------------------------------------------------------------

/// Event handler that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub severity_changes: Mutex<Vec<SeverityChangedEvent>>,
    pub cdev_updates: Mutex<Vec<CoolingDeviceUpdatedEvent>>,
    pub hints: Mutex<Vec<PowerHintSentEvent>>,
    pub ticks: Mutex<Vec<TickCompleteEvent>>,
    pub errors: Mutex<Vec<ErrorEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn severity_changes(&self) -> Vec<SeverityChangedEvent> {
        self.severity_changes.lock().unwrap().clone()
    }

    pub fn cdev_updates(&self) -> Vec<CoolingDeviceUpdatedEvent> {
        self.cdev_updates.lock().unwrap().clone()
    }

    pub fn error_codes(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.error_code.clone())
            .collect()
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.lock().unwrap().len()
    }
}

impl ThermalEventHandler for RecordingHandler {
    fn on_severity_changed(&self, event: &SeverityChangedEvent) {
        self.severity_changes.lock().unwrap().push(event.clone());
    }

    fn on_cooling_device_updated(&self, event: &CoolingDeviceUpdatedEvent) {
        self.cdev_updates.lock().unwrap().push(event.clone());
    }

    fn on_power_hint_sent(&self, event: &PowerHintSentEvent) {
        self.hints.lock().unwrap().push(event.clone());
    }

    fn on_tick_complete(&self, event: &TickCompleteEvent) {
        self.ticks.lock().unwrap().push(event.clone());
    }

    fn on_error(&self, event: &ErrorEvent) {
        self.errors.lock().unwrap().push(event.clone());
    }
}
