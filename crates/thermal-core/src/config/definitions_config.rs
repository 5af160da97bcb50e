//! Location of the sensor and cooling-device definitions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFINITIONS_FILE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Path of the definitions JSON. Default: `thermal_info_config.json`
    /// in the config directory.
    pub path: Option<String>,
}

impl DefinitionsConfig {
    pub fn effective_path(&self, config_dir: &Path) -> PathBuf {
        match &self.path {
            Some(p) => PathBuf::from(p),
            None => config_dir.join(DEFINITIONS_FILE),
        }
    }
}
