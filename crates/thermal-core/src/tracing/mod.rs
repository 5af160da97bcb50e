//! Observability for the thermal engine.
//! `tracing` crate with `EnvFilter`, plus span helpers for the evaluation pass.

pub mod setup;
pub mod spans;

pub use setup::{init_tracing, init_tracing_with_filter};
