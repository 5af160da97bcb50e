//! Watcher thread and startup binding errors.

use super::error_code::{self, ThermalErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Failed to spawn watcher thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("Watcher thread panicked")]
    Panicked,

    #[error("No file bound for {kind} {name}")]
    Unbound { kind: &'static str, name: String },
}

impl ThermalErrorCode for WatcherError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unbound { .. } => error_code::BINDING_FAILED,
            _ => error_code::WATCHER_ERROR,
        }
    }
}
