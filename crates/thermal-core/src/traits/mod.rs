//! Interfaces to the engine's external collaborators.

pub mod cancellation;
pub mod power_hint;
pub mod raw_io;

pub use cancellation::{Cancellable, CancellationToken};
pub use power_hint::PowerHintService;
pub use raw_io::RawIo;
