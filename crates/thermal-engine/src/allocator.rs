//! Maps a sensor's power budget or severity onto cooling-device states.
//!
//! Both paths write into slices aligned with the sensor's
//! [`SensorNode::pid_cdevs`] and [`SensorNode::limit_cdevs`].

use thermal_core::errors::AllocationError;
use thermal_core::types::ThrottleType;
use thermal_core::Severity;

use crate::topology::{SensorNode, ThermalTopology};

/// State selected by `budget` on a power curve.
///
/// Scans from state 0 and stops at the first entry the budget strictly
/// exceeds; the last state is selected when none is exceeded. Curves list
/// the power drawn at each state, highest first.
pub fn state_for_budget(curve: &[f64], budget: f64) -> i32 {
    let last = curve.len().saturating_sub(1);
    let state = curve[..last]
        .iter()
        .position(|&threshold| budget > threshold)
        .unwrap_or(last);
    state as i32
}

/// Split `budget` across the sensor's weighted devices and select a state
/// for each. On zero total weight nothing is written.
pub fn allocate_by_power(
    topology: &ThermalTopology,
    node: &SensorNode,
    budget: f64,
    requests: &mut [i32],
) -> Result<(), AllocationError> {
    let total: f64 = node.pid_cdevs.iter().map(|(_, w)| *w).sum();
    if total <= 0.0 {
        return Err(AllocationError::ZeroWeight {
            sensor: node.info.name.clone(),
        });
    }

    for (slot, (cdev, weight)) in requests.iter_mut().zip(node.pid_cdevs.iter()) {
        let share = if *weight == 0.0 {
            0.0
        } else {
            budget * (weight / total)
        };
        let curve = &topology.cdev(*cdev).info.power_to_state;
        *slot = state_for_budget(curve, share);
        tracing::debug!(
            sensor = %node.info.name,
            cdev = %topology.cdev(*cdev).info.name,
            share,
            state = *slot,
            "power allocated"
        );
    }
    Ok(())
}

/// The highest LIMIT-typed level at or below `severity`, NONE if there is
/// none.
pub fn limit_level(node: &SensorNode, severity: Severity) -> Severity {
    let Some(throttling) = &node.info.throttling else {
        return Severity::None;
    };
    (1..=severity.index())
        .rev()
        .filter_map(Severity::from_index)
        .find(|level| throttling.throttle_type_at(*level) == ThrottleType::Limit)
        .unwrap_or(Severity::None)
}

/// Select each hard-limited device's state from its table.
pub fn allocate_by_severity(node: &SensorNode, severity: Severity, requests: &mut [i32]) {
    let level = limit_level(node, severity);
    for (slot, (_, table)) in requests.iter_mut().zip(node.limit_cdevs.iter()) {
        *slot = table[level.index()];
    }
}
