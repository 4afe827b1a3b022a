//! Tracing initialization. Logs go to stderr so stdout stays the tool's output.

use crate::config::LOG_ENV_VAR;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Filter used when `BOOTSTRAP_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Initialize tracing. Call once at process startup.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
