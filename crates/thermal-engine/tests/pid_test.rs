use std::time::Duration;

use test_fixtures::{at, pid_throttling, Gains};
use thermal_core::types::ThrottleType;
use thermal_core::{Severity, ThrottlingInfo};
use thermal_engine::pid::target_level;
use thermal_engine::PidState;

fn severe_at_40(gains: Gains) -> ([f64; 7], ThrottlingInfo) {
    (at(Severity::Severe, 40.0), pid_throttling(Severity::Severe, gains, &[("cpu", 1.0)]))
}

const SEC: Duration = Duration::from_secs(1);

#[test]
fn test_overshoot_uses_over_threshold_gain() {
    let (hot, t) = severe_at_40(Gains {
        k_po: 1.0,
        k_pu: 7.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();
    let out = pid.step(&hot, &t, Severity::Severe, 45.0, SEC);
    assert_eq!(out.target, Some(Severity::Severe));
    assert_eq!(out.error, -5.0);
    assert_eq!(out.p, -5.0);
    assert_eq!(out.budget, -5.0);
}

#[test]
fn test_budget_falls_with_larger_overshoot() {
    let (hot, t) = severe_at_40(Gains::default());
    let small = PidState::default().step(&hot, &t, Severity::Severe, 45.0, SEC).budget;
    let large = PidState::default().step(&hot, &t, Severity::Severe, 50.0, SEC).budget;
    assert!(large < small);
}

#[test]
fn test_undershoot_uses_under_threshold_gain() {
    let (hot, t) = severe_at_40(Gains {
        k_po: 1.0,
        k_pu: 3.0,
        s_power: 100.0,
        ..Gains::default()
    });
    let out = PidState::default().step(&hot, &t, Severity::Severe, 38.0, SEC);
    assert_eq!(out.p, 6.0);
    assert_eq!(out.budget, 106.0);
}

#[test]
fn test_severity_none_resets_and_is_unconstrained() {
    let (hot, t) = severe_at_40(Gains {
        k_i: 1.0,
        i_max: 100.0,
        i_cutoff: 100.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();
    pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    assert_eq!(pid.integral, 5.0);

    let out = pid.step(&hot, &t, Severity::None, 35.0, SEC);
    assert_eq!(out.budget, f64::INFINITY);
    assert_eq!(out.target, None);
    assert_eq!(pid.integral, 0.0);
    assert!(pid.prev_error.is_nan());
}

#[test]
fn test_no_pid_level_is_unconstrained() {
    let t = ThrottlingInfo::default();
    let mut pid = PidState::default();
    let out = pid.step(&at(Severity::Severe, 40.0), &t, Severity::Critical, 60.0, SEC);
    assert_eq!(out.budget, f64::INFINITY);
}

#[test]
fn test_target_is_first_pid_level_above_current() {
    let mut t = ThrottlingInfo::default();
    t.throttle_type[Severity::Moderate.index()] = ThrottleType::Pid;
    t.throttle_type[Severity::Critical.index()] = ThrottleType::Pid;

    assert_eq!(target_level(&t, Severity::Light), Some(Severity::Moderate));
    assert_eq!(target_level(&t, Severity::Moderate), Some(Severity::Critical));
    assert_eq!(target_level(&t, Severity::Severe), Some(Severity::Critical));
    // Nothing above: the highest PID level.
    assert_eq!(target_level(&t, Severity::Critical), Some(Severity::Critical));
    assert_eq!(target_level(&t, Severity::Shutdown), Some(Severity::Critical));
}

#[test]
fn test_integral_stops_at_max_magnitude() {
    let (hot, t) = severe_at_40(Gains {
        k_i: 1.0,
        i_max: 10.0,
        i_cutoff: 100.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();

    let first = pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    assert_eq!(first.i, 5.0);
    assert_eq!(pid.integral, 5.0);

    // 5 + 5 = 10 is not under the max, so nothing accumulates.
    let second = pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    assert_eq!(second.i, 5.0);
    assert_eq!(pid.integral, 5.0);
}

#[test]
fn test_integral_only_accumulates_below_cutoff() {
    let (hot, t) = severe_at_40(Gains {
        k_i: 1.0,
        i_max: 1000.0,
        i_cutoff: 3.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();
    let out = pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    assert_eq!(out.i, 0.0);
    assert_eq!(pid.integral, 0.0);

    let out = pid.step(&hot, &t, Severity::Severe, 38.0, SEC);
    assert_eq!(out.i, 2.0);
    assert_eq!(pid.integral, 2.0);
}

#[test]
fn test_derivative_scales_by_elapsed_milliseconds() {
    let (hot, t) = severe_at_40(Gains {
        k_po: 0.0,
        k_pu: 0.0,
        k_d: 1000.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();
    let first = pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    assert_eq!(first.d, 0.0);
    assert_eq!(pid.prev_error, 5.0);

    let second = pid.step(&hot, &t, Severity::Severe, 37.0, SEC);
    assert_eq!(second.d, -2.0);
}

#[test]
fn test_zero_elapsed_skips_derivative_but_records_error() {
    let (hot, t) = severe_at_40(Gains {
        k_d: 1000.0,
        ..Gains::default()
    });
    let mut pid = PidState::default();
    pid.step(&hot, &t, Severity::Severe, 35.0, SEC);
    let out = pid.step(&hot, &t, Severity::Severe, 30.0, Duration::ZERO);
    assert_eq!(out.d, 0.0);
    assert_eq!(pid.prev_error, 10.0);
}

#[test]
fn test_budget_is_clamped_to_allocation_window() {
    let (hot, t) = severe_at_40(Gains {
        s_power: 500.0,
        min_alloc_power: 100.0,
        max_alloc_power: 600.0,
        ..Gains::default()
    });
    let high = PidState::default().step(&hot, &t, Severity::Severe, -1000.0, SEC);
    assert_eq!(high.budget, 600.0);
    let low = PidState::default().step(&hot, &t, Severity::Severe, 1000.0, SEC);
    assert_eq!(low.budget, 100.0);
}
