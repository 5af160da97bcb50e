//! Per-sensor mutable state.
//!
//! Severity fields are shared with query callers behind a read/write lock.
//! Controller state and requests belong to the evaluation pass alone.

use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use thermal_core::types::collections::SmallVec8;
use thermal_core::types::{CdevId, SensorId};
use thermal_core::Severity;

use crate::classifier::SeverityPair;
use crate::pid::PidState;
use crate::topology::SensorNode;

/// Severity state of one sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityStatus {
    pub severity: Severity,
    pub prev_hot: Severity,
    pub prev_cold: Severity,
    /// Last hint severity sent to the power-hint service.
    pub prev_hint: Severity,
}

impl SeverityStatus {
    pub fn previous(&self) -> SeverityPair {
        SeverityPair::new(self.prev_hot, self.prev_cold)
    }
}

#[derive(Debug)]
pub struct StatusTable {
    inner: RwLock<Vec<SeverityStatus>>,
}

impl StatusTable {
    pub fn new(sensor_count: usize) -> Self {
        Self {
            inner: RwLock::new(vec![SeverityStatus::default(); sensor_count]),
        }
    }

    pub fn get(&self, id: SensorId) -> SeverityStatus {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard[id.index()]
    }

    /// Mutate one sensor's status under the write lock.
    pub fn update<R>(&self, id: SensorId, f: impl FnOnce(&mut SeverityStatus) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard[id.index()])
    }
}

/// Evaluation-thread state of one sensor.
#[derive(Debug, Clone)]
pub struct ControlState {
    pub pid: PidState,
    /// Aligned with [`SensorNode::pid_cdevs`].
    pub pid_requests: SmallVec8<i32>,
    /// Aligned with [`SensorNode::limit_cdevs`].
    pub limit_requests: SmallVec8<i32>,
    /// `None` until the first evaluation.
    pub last_update: Option<Instant>,
}

impl ControlState {
    pub fn for_sensor(node: &SensorNode) -> Self {
        Self {
            pid: PidState::default(),
            pid_requests: SmallVec8::from_elem(0, node.pid_cdevs.len()),
            limit_requests: SmallVec8::from_elem(0, node.limit_cdevs.len()),
            last_update: None,
        }
    }

    /// This sensor's request for `cdev`: the larger of its PID and
    /// hard-limit requests.
    pub fn combined_request(&self, node: &SensorNode, cdev: CdevId) -> i32 {
        let pid = node
            .pid_cdevs
            .iter()
            .position(|(c, _)| *c == cdev)
            .map(|i| self.pid_requests[i])
            .unwrap_or(0);
        let limit = node
            .limit_cdevs
            .iter()
            .position(|(c, _)| *c == cdev)
            .map(|i| self.limit_requests[i])
            .unwrap_or(0);
        pid.max(limit)
    }
}
