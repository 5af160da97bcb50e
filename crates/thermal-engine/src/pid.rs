//! Per-sensor PID power budget.

use std::time::Duration;

use thermal_core::types::ThrottleType;
use thermal_core::{Severity, ThrottlingArray, ThrottlingInfo};

/// Controller state carried between passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidState {
    pub integral: f64,
    /// NaN until the first pass that computes an error.
    pub prev_error: f64,
}

impl Default for PidState {
    fn default() -> Self {
        Self {
            integral: 0.0,
            prev_error: f64::NAN,
        }
    }
}

/// One controller step. `budget` is `+inf` when no PID level applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    pub target: Option<Severity>,
    pub error: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub budget: f64,
}

impl PidOutput {
    fn unconstrained() -> Self {
        Self {
            target: None,
            error: f64::NAN,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            budget: f64::INFINITY,
        }
    }
}

/// The PID level the controller regulates toward.
///
/// The first PID-typed level above `current` wins; when none lies above,
/// the highest PID level is used. `None` when no level is PID-typed.
pub fn target_level(throttling: &ThrottlingInfo, current: Severity) -> Option<Severity> {
    let mut target = None;
    for level in Severity::ALL {
        if throttling.throttle_type_at(level) != ThrottleType::Pid {
            continue;
        }
        target = Some(level);
        if level > current {
            break;
        }
    }
    target
}

impl PidState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Compute the power budget for this pass and advance the state.
    ///
    /// `elapsed` is the time since the sensor's previous evaluation; the
    /// derivative term is skipped when it is zero.
    pub fn step(
        &mut self,
        hot_thresholds: &ThrottlingArray,
        throttling: &ThrottlingInfo,
        severity: Severity,
        value: f64,
        elapsed: Duration,
    ) -> PidOutput {
        let target = match target_level(throttling, severity) {
            Some(level) if !severity.is_none() => level,
            _ => {
                self.reset();
                return PidOutput::unconstrained();
            }
        };
        let t = throttling;
        let idx = target.index();

        let error = hot_thresholds[idx] - value;
        let p = error * if error < 0.0 { t.k_po[idx] } else { t.k_pu[idx] };

        let mut i = self.integral * t.k_i[idx];
        if error < t.i_cutoff[idx] {
            let next = i + error * t.k_i[idx];
            if next.abs() < t.i_max[idx] {
                i = next;
                self.integral += error;
            }
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let d = if !self.prev_error.is_nan() && elapsed_ms > 0.0 {
            t.k_d[idx] * (error - self.prev_error) / elapsed_ms
        } else {
            0.0
        };
        self.prev_error = error;

        let mut budget = t.s_power[idx] + p + i + d;
        if budget < t.min_alloc_power[idx] {
            budget = t.min_alloc_power[idx];
        }
        if budget > t.max_alloc_power[idx] {
            budget = t.max_alloc_power[idx];
        }

        tracing::debug!(
            target_level = %target,
            error,
            p,
            i,
            d,
            budget,
            "pid step"
        );

        PidOutput {
            target: Some(target),
            error,
            p,
            i,
            d,
            budget,
        }
    }
}
