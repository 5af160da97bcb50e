//! Max-wins aggregation of cooling-device requests.
//!
//! Each device keeps one slot per sensor declared to request it. The
//! effective state is the maximum over those slots; a device is written
//! only when a request changed and that maximum differs from the last
//! value applied. A failed write is not retried; the device stays stale
//! until one of its requests changes.

use thermal_core::types::collections::SmallVec8;
use thermal_core::types::{CdevId, SensorId};

use crate::topology::ThermalTopology;

#[derive(Debug, Clone)]
pub struct AggregationTable {
    requests: Vec<SmallVec8<(SensorId, i32)>>,
    applied: Vec<Option<i32>>,
    dirty: Vec<bool>,
}

impl AggregationTable {
    /// One zeroed slot per (device, declared requester).
    pub fn new(topology: &ThermalTopology) -> Self {
        let requests = topology
            .cdevs()
            .iter()
            .map(|c| c.requesters.iter().map(|s| (*s, 0)).collect())
            .collect();
        let n = topology.cdev_count();
        Self {
            requests,
            applied: vec![None; n],
            dirty: vec![false; n],
        }
    }

    /// Record `sensor`'s request for `cdev`. Returns whether the slot
    /// changed. Requests from undeclared sensors are ignored.
    pub fn submit(&mut self, cdev: CdevId, sensor: SensorId, state: i32) -> bool {
        let Some(slot) = self.requests[cdev.index()]
            .iter_mut()
            .find(|(s, _)| *s == sensor)
        else {
            tracing::warn!(%cdev, %sensor, "request from undeclared sensor ignored");
            return false;
        };
        if slot.1 == state {
            return false;
        }
        slot.1 = state;
        self.dirty[cdev.index()] = true;
        true
    }

    pub fn request(&self, cdev: CdevId, sensor: SensorId) -> Option<i32> {
        self.requests[cdev.index()]
            .iter()
            .find(|(s, _)| *s == sensor)
            .map(|(_, v)| *v)
    }

    /// Maximum over all requesters; 0 when the device has none.
    pub fn effective_state(&self, cdev: CdevId) -> i32 {
        self.requests[cdev.index()]
            .iter()
            .map(|(_, v)| *v)
            .max()
            .unwrap_or(0)
    }

    pub fn applied(&self, cdev: CdevId) -> Option<i32> {
        self.applied[cdev.index()]
    }

    /// Devices changed since the last call whose effective state differs
    /// from the applied one. Clears the changed marks.
    pub fn take_pending(&mut self) -> SmallVec8<(CdevId, i32)> {
        let mut pending = SmallVec8::new();
        for i in 0..self.dirty.len() {
            if !std::mem::take(&mut self.dirty[i]) {
                continue;
            }
            let cdev = CdevId::new(i);
            let state = self.effective_state(cdev);
            if self.applied[i] != Some(state) {
                pending.push((cdev, state));
            }
        }
        pending
    }

    pub fn mark_applied(&mut self, cdev: CdevId, state: i32) {
        self.applied[cdev.index()] = Some(state);
    }
}
