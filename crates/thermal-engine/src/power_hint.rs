//! Bridge from severity transitions to power-hint modes.
//!
//! The remote connection is an explicit [`ConnectionState`]. Each public
//! call makes at most one reconnect attempt; any failed call drops the
//! connection so the next public call reconnects.

use std::sync::{Arc, Mutex, PoisonError};

use thermal_core::constants::{POWER_HINT_PREFIX, SEVERITY_COUNT};
use thermal_core::errors::PowerHintError;
use thermal_core::traits::PowerHintService;
use thermal_core::Severity;

/// Effective hint severity for each severity level of one sensor.
pub type SupportTable = [Severity; SEVERITY_COUNT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Mode string for a sensor at a severity, e.g. `THERMAL_skin_SEVERE`.
/// The sensor name is used as written.
pub fn hint_name(sensor: &str, severity: Severity) -> String {
    format!("{POWER_HINT_PREFIX}_{sensor}_{}", severity.as_str())
}

/// Build a support table from per-level query results.
///
/// Levels are queried in ascending order; an unsupported level maps to the
/// last supported level below it. NONE always maps to NONE.
pub fn support_table_from(mut supported: impl FnMut(Severity) -> bool) -> SupportTable {
    let mut table = [Severity::None; SEVERITY_COUNT];
    let mut effective = Severity::None;
    for level in Severity::ALL.into_iter().skip(1) {
        if supported(level) {
            effective = level;
        }
        table[level.index()] = effective;
    }
    table
}

pub struct PowerHintBridge {
    service: Arc<dyn PowerHintService>,
    state: Mutex<ConnectionState>,
}

impl std::fmt::Debug for PowerHintBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerHintBridge")
            .field("state", &self.state())
            .finish()
    }
}

impl PowerHintBridge {
    pub fn new(service: Arc<dyn PowerHintService>) -> Self {
        Self {
            service,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on a connected service, reconnecting once if needed.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&dyn PowerHintService) -> Result<T, PowerHintError>,
    ) -> Result<T, PowerHintError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == ConnectionState::Disconnected {
            self.service.connect()?;
            *state = ConnectionState::Connected;
            tracing::info!("connected to power hint service");
        }
        f(self.service.as_ref()).inspect_err(|e| {
            *state = ConnectionState::Disconnected;
            tracing::warn!(error = %e, "power hint connection dropped");
        })
    }

    /// Probe every severity for `sensor` and build its support table.
    /// A failed query counts as unsupported.
    pub fn query_support(&self, sensor: &str) -> SupportTable {
        support_table_from(|level| {
            let hint = hint_name(sensor, level);
            match self.with_connection(|s| s.is_mode_supported(&hint)) {
                Ok(supported) => supported,
                Err(e) => {
                    tracing::debug!(%hint, error = %e, "power hint query failed");
                    false
                }
            }
        })
    }

    /// Move `sensor` from hint severity `previous` to `next`.
    ///
    /// The previous mode is disabled before the next is enabled; NONE is
    /// never sent. Returns the modes sent as `(hint, enable)` pairs.
    pub fn transition(
        &self,
        sensor: &str,
        previous: Severity,
        next: Severity,
    ) -> Result<Vec<(String, bool)>, PowerHintError> {
        if previous == next {
            return Ok(Vec::new());
        }
        self.with_connection(|service| {
            let mut sent = Vec::with_capacity(2);
            if !previous.is_none() {
                let hint = hint_name(sensor, previous);
                service.set_mode(&hint, false)?;
                sent.push((hint, false));
            }
            if !next.is_none() {
                let hint = hint_name(sensor, next);
                service.set_mode(&hint, true)?;
                sent.push((hint, true));
            }
            Ok(sent)
        })
    }
}
