use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use test_fixtures::{
    cdev, definitions, levels, load_definitions, load_fixture_value, sensor, FakePowerHint,
    MemoryIo,
};
use thermal_core::errors::{ThermalErrorCode, WatcherError};
use thermal_core::traits::RawIo;
use thermal_core::types::{CoolingType, Formula, SensorType};
use thermal_core::{EngineConfig, Severity, ThermalError};
use thermal_engine::virtual_sensor::combine;
use thermal_engine::{EvaluationScheduler, ThermalEngine, ThermalFiles};

const NAN: f64 = f64::NAN;

fn fixture_engine(io: &Arc<MemoryIo>) -> ThermalEngine {
    let defs = load_definitions("definitions/skin_cpu.json");
    ThermalEngine::new(&defs, EngineConfig::default(), io.clone()).unwrap()
}

fn fixture_io() -> Arc<MemoryIo> {
    let io = Arc::new(MemoryIo::new());
    io.set("skin", 46000);
    io.set("battery", 25000);
    io.set("cpu_temp", 61000);
    io.set("gpu_temp", 52000);
    io.set("cpu", 0);
    io.set("gpu", 1);
    io
}

// ── Construction ─────────────────────────────────────────────────────────

#[test]
fn test_undeclared_cooling_device_is_fatal() {
    let defs = definitions(
        vec![sensor("skin")
            .throttling(test_fixtures::limit_throttling(&[Severity::Light], "ghost", [0; 7]))
            .build()],
        vec![],
    );
    let err = ThermalEngine::new(&defs, EngineConfig::default(), Arc::new(MemoryIo::new()))
        .unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_INTEGRITY");
}

#[test]
fn test_invalid_engine_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.watcher.min_poll_interval_ms = Some(0);
    let err = ThermalEngine::new(&definitions(vec![], vec![]), config, Arc::new(MemoryIo::new()))
        .unwrap_err();
    assert!(matches!(err, ThermalError::Config(_)));
}

#[test]
fn test_configured_log_filter_is_accepted_at_startup() {
    let config = EngineConfig::from_toml("[logging]\nfilter = \"thermal_engine=debug\"\n").unwrap();
    let engine =
        ThermalEngine::new(&definitions(vec![], vec![]), config, Arc::new(MemoryIo::new())).unwrap();
    assert_eq!(engine.config().logging.effective_filter(), "thermal_engine=debug");
}

#[test]
fn test_rising_power_curve_does_not_fail_startup() {
    let defs = definitions(vec![], vec![cdev("cpu", &[100.0, 200.0, 300.0])]);
    let engine = ThermalEngine::new(&defs, EngineConfig::default(), Arc::new(MemoryIo::new()));
    assert!(engine.is_ok());
}

#[test]
fn test_fixture_topology_resolves_requests() {
    let engine = fixture_engine(&fixture_io());
    let topology = engine.topology();
    let skin = topology.sensor(topology.sensor_id("skin").unwrap());
    assert_eq!(skin.pid_cdevs.len(), 1);
    assert_eq!(skin.limit_cdevs.len(), 1);
    assert_eq!(skin.cdevs.len(), 2);

    let gpu = topology.cdev(topology.cdev_id("gpu").unwrap());
    assert_eq!(gpu.requesters.as_slice(), &[skin.id]);
}

// ── Queries ──────────────────────────────────────────────────────────────

#[test]
fn test_read_temperature_scales_and_classifies() {
    let engine = fixture_engine(&fixture_io());
    let t = engine.read_temperature("skin").unwrap();
    assert_eq!(t.value, 46.0);
    assert_eq!(t.sensor_type, SensorType::Skin);
    assert_eq!(t.throttling_status, Severity::Severe);
    // Queries do not record severity.
    assert_eq!(engine.sensor_severity("skin").unwrap(), Severity::None);
}

#[test]
fn test_unknown_sensor_is_not_found() {
    let engine = fixture_engine(&fixture_io());
    let err = engine.read_temperature("nope").unwrap_err();
    assert_eq!(err.error_code(), "SENSOR_NOT_FOUND");
    assert!(engine.sensor_severity("nope").is_err());
}

#[test]
fn test_temperatures_can_be_filtered_by_type() {
    let engine = fixture_engine(&fixture_io());
    let all = engine.current_temperatures(None).unwrap();
    assert_eq!(all.len(), 5);

    let cpu = engine.current_temperatures(Some(SensorType::Cpu)).unwrap();
    let names: Vec<_> = cpu.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["cpu_temp", "soc_max"]);
    assert_eq!(cpu[1].value, 61.0);
}

#[test]
fn test_any_unreadable_sensor_fails_the_listing() {
    let io = fixture_io();
    io.fail_reads("battery", true);
    let engine = fixture_engine(&io);
    assert!(engine.current_temperatures(None).is_err());
    assert!(engine.current_temperatures(Some(SensorType::Skin)).is_ok());
}

#[test]
fn test_thresholds_are_reported_as_configured() {
    let engine = fixture_engine(&fixture_io());
    let thresholds = engine.temperature_thresholds(Some(SensorType::Battery));
    assert_eq!(thresholds.len(), 1);
    assert_eq!(thresholds[0].cold_thresholds[1], 15.0);
    assert!(thresholds[0].hot_thresholds.iter().all(|v| v.is_nan()));
}

#[test]
fn test_cooling_devices_are_read_back() {
    let engine = fixture_engine(&fixture_io());
    let devices = engine.current_cooling_devices(None).unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[1].value, 1);

    let gpus = engine.current_cooling_devices(Some(CoolingType::Gpu)).unwrap();
    assert_eq!(gpus.len(), 1);
    assert_eq!(gpus[0].name, "gpu");
}

#[test]
fn test_sensor_severity_reflects_last_pass() {
    let io = fixture_io();
    let engine = fixture_engine(&io);
    let mut scheduler = EvaluationScheduler::new(&engine);
    scheduler.tick(&engine, &FxHashSet::default(), Instant::now());
    assert_eq!(engine.sensor_severity("skin").unwrap(), Severity::Severe);
    assert_eq!(engine.sensor_severity("soc_max").unwrap(), Severity::Light);
    // PID budget 1200 - 50 exceeds only the 1000 entry of the cpu curve.
    assert_eq!(io.get("cpu").as_deref(), Some("2"));
    // SEVERE is a PID level, so the limit table falls back to MODERATE.
    assert_eq!(io.get("gpu").as_deref(), Some("1"));
}

#[test]
fn test_fixture_definitions_keep_unset_thresholds_as_null() {
    let raw = load_fixture_value("definitions/skin_cpu.json");
    let defs = load_definitions("definitions/skin_cpu.json");
    let reserialized = serde_json::to_value(&defs.sensors[0]).unwrap();
    let (raw, out) = (&raw["sensors"][0]["hot_thresholds"], &reserialized["hot_thresholds"]);
    for i in 0..7 {
        assert_eq!(raw[i].is_null(), out[i].is_null(), "level {i}");
        assert_eq!(raw[i].as_f64(), out[i].as_f64(), "level {i}");
    }
}

#[test]
fn test_scheduler_floor_follows_config() {
    let io = fixture_io();
    let engine = fixture_engine(&io);
    assert_eq!(EvaluationScheduler::new(&engine).floor(), Duration::from_millis(2_000));
}

#[test]
fn test_power_hints_respect_configuration() {
    let io = fixture_io();
    let defs = load_definitions("definitions/skin_cpu.json");
    let fake = Arc::new(FakePowerHint::supporting(&["THERMAL_skin_SEVERE"]));

    let mut enabled = ThermalEngine::new(&defs, EngineConfig::default(), io.clone()).unwrap();
    enabled.connect_power_hints(fake.clone());
    assert!(enabled.power_hints().is_some());

    let mut config = EngineConfig::default();
    config.power_hint.enabled = Some(false);
    let mut disabled = ThermalEngine::new(&defs, config, io).unwrap();
    disabled.connect_power_hints(fake);
    assert!(disabled.power_hints().is_none());
}

// ── Virtual sensors ──────────────────────────────────────────────────────

#[test]
fn test_formulas_combine_weighted_readings() {
    let samples = [(10.0, 0.5), (30.0, 2.0), (20.0, 1.0)];
    assert_eq!(combine(Formula::WeightedAvg, samples), Some(85.0));
    assert_eq!(combine(Formula::Maximum, samples), Some(60.0));
    assert_eq!(combine(Formula::Minimum, samples), Some(5.0));
    assert_eq!(combine(Formula::Maximum, []), None);
}

#[test]
fn test_count_threshold_counts_past_coefficient() {
    // Non-negative coefficient: reading >= c. Negative: reading < -c.
    let samples = [(40.0, 40.0), (39.0, 40.0), (5.0, -10.0), (15.0, -10.0)];
    assert_eq!(combine(Formula::CountThreshold, samples), Some(2.0));
}

#[test]
fn test_unreadable_linked_sources_are_skipped() {
    let io = Arc::new(MemoryIo::new());
    io.set("a", 10);
    io.set("b", 30);
    let defs = definitions(
        vec![
            sensor("a").unmonitored().build(),
            sensor("b").unmonitored().build(),
            sensor("v")
                .hot(levels([NAN; 6]), levels([0.0; 6]))
                .multiplier(2.0)
                .virtual_of(Formula::Maximum, "a", &[("a", 1.0), ("b", 1.0)])
                .build(),
        ],
        vec![],
    );
    let engine = ThermalEngine::new(&defs, EngineConfig::default(), io.clone()).unwrap();
    assert_eq!(engine.read_temperature("v").unwrap().value, 60.0);

    io.fail_reads("b", true);
    assert_eq!(engine.read_temperature("v").unwrap().value, 20.0);

    io.fail_reads("a", true);
    let err = engine.read_temperature("v").unwrap_err();
    assert!(err.to_string().contains("no readable sources"));
}

// ── File binding ─────────────────────────────────────────────────────────

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_bound_files_read_and_write() {
    let dir = tempfile::tempdir().unwrap();
    let defs = definitions(
        vec![sensor("skin").build()],
        vec![cdev("fan", &[10.0, 0.0])],
    );
    let mut paths = FxHashMap::default();
    paths.insert("skin".to_string(), write_file(&dir, "temp", "41500\n"));
    paths.insert("fan".to_string(), write_file(&dir, "cur_state", "0"));

    let files = ThermalFiles::bind_all(&defs, &paths).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files.read_value("skin").unwrap(), "41500\n");

    files.write_value("fan", "3").unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("cur_state")).unwrap(), "3");
    assert!(files.read_value("ghost").is_err());
}

#[test]
fn test_missing_binding_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let defs = definitions(vec![sensor("skin").build()], vec![cdev("fan", &[0.0])]);
    let mut paths = FxHashMap::default();
    paths.insert("skin".to_string(), write_file(&dir, "temp", "1"));
    paths.insert("fan".to_string(), dir.path().join("does_not_exist"));

    let err = ThermalFiles::bind_all(&defs, &paths).unwrap_err();
    assert!(matches!(err, WatcherError::Unbound { kind: "cooling device", ref name } if name == "fan"));
}

#[test]
fn test_virtual_sensors_bind_their_sources() {
    let dir = tempfile::tempdir().unwrap();
    let defs = definitions(
        vec![
            sensor("a").unmonitored().build(),
            sensor("v").virtual_of(Formula::WeightedAvg, "a", &[("a", 1.0)]).build(),
        ],
        vec![],
    );
    let mut paths = FxHashMap::default();
    paths.insert("a".to_string(), write_file(&dir, "a", "7"));

    let files = Arc::new(ThermalFiles::bind_all(&defs, &paths).unwrap());
    assert!(files.path_of("v").is_none());
    let engine = ThermalEngine::new(&defs, EngineConfig::default(), files).unwrap();
    assert_eq!(engine.read_temperature("v").unwrap().value, 7.0);
}
