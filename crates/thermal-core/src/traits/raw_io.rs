//! Raw text I/O on sensor and cooling-device files.

use crate::errors::IoError;

/// Reads sensor values and writes cooling-device states by name.
///
/// The engine treats a read failure as "skip this sensor for this pass"
/// and a write failure as "log and continue"; neither is retried.
pub trait RawIo: Send + Sync {
    /// Current raw text for `id`.
    fn read_value(&self, id: &str) -> Result<String, IoError>;

    /// Replace the contents bound to `id` with `value`.
    fn write_value(&self, id: &str, value: &str) -> Result<(), IoError>;
}
