//! Notification sink: severity changes and engine activity delivered to
//! registered handlers.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ThermalEventHandler;
pub use types::*;
