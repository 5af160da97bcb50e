//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::DEFAULT_LOG_FILTER;

static INIT: Once = Once::new();

/// Initialize the thermal tracing/logging system.
///
/// Reads `THERMAL_LOG` for per-module log levels, e.g.
/// `THERMAL_LOG=thermal_engine::scheduler=debug,thermal_engine=info`.
/// Falls back to `thermal=info` if `THERMAL_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    init_tracing_with_filter(DEFAULT_LOG_FILTER);
}

/// Like [`init_tracing`], with `fallback` used when `THERMAL_LOG` is unset.
pub fn init_tracing_with_filter(fallback: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("THERMAL_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

        // Another subscriber may already be installed by the embedding process.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
