//! Name-to-path binding for sensor and cooling-device files.
//!
//! Paths are supplied by the caller; nothing is discovered here.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;
use thermal_core::errors::{IoError, WatcherError};
use thermal_core::traits::RawIo;
use thermal_core::ThermalDefinitions;

/// File-backed [`RawIo`].
#[derive(Debug, Default)]
pub struct ThermalFiles {
    paths: RwLock<FxHashMap<String, PathBuf>>,
}

impl ThermalFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `path`. Returns false (and binds nothing) if the
    /// path does not exist.
    pub fn add_file(&self, name: &str, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !path.exists() {
            tracing::error!(name, path = %path.display(), "thermal file missing");
            return false;
        }
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), path.to_path_buf());
        true
    }

    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        self.paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.paths.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind every sensor and cooling device in `defs` from `paths`.
    ///
    /// Virtual sensors are not bound themselves; their linked sources are.
    /// Any name left without an existing file fails startup.
    pub fn bind_all(
        defs: &ThermalDefinitions,
        paths: &FxHashMap<String, PathBuf>,
    ) -> Result<Self, WatcherError> {
        let files = Self::new();
        let mut names: Vec<(&'static str, &str)> = Vec::new();
        for sensor in &defs.sensors {
            match &sensor.virtual_sensor {
                Some(v) => names.extend(v.linked_sensors.iter().map(|l| ("sensor", l.name.as_str()))),
                None => names.push(("sensor", sensor.name.as_str())),
            }
        }
        names.extend(defs.cooling_devices.iter().map(|c| ("cooling device", c.name.as_str())));

        for (kind, name) in names {
            if files.path_of(name).is_some() {
                continue;
            }
            let bound = paths
                .get(name)
                .map(|p| files.add_file(name, p))
                .unwrap_or(false);
            if !bound {
                return Err(WatcherError::Unbound {
                    kind,
                    name: name.to_string(),
                });
            }
        }
        tracing::info!(bound = files.len(), "thermal files bound");
        Ok(files)
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, IoError> {
        self.path_of(id).ok_or_else(|| IoError::NotFound { id: id.to_string() })
    }
}

impl RawIo for ThermalFiles {
    fn read_value(&self, id: &str) -> Result<String, IoError> {
        let path = self.resolve(id)?;
        std::fs::read_to_string(&path).map_err(|e| IoError::Failed {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    fn write_value(&self, id: &str, value: &str) -> Result<(), IoError> {
        let path = self.resolve(id)?;
        std::fs::write(&path, value).map_err(|e| IoError::Failed {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }
}
