//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the markaudit tracing/logging system.
///
/// Reads `MARKAUDIT_LOG` for per-target log levels, e.g.
/// `MARKAUDIT_LOG=markaudit_analysis::oracle=debug`. Falls back to
/// `default_directive` when the variable is unset or invalid.
///
/// Logs go to stderr; stdout is reserved for the rendered report.
/// Idempotent.
pub fn init_tracing(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
