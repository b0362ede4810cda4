//! Tracing subscriber setup

use thanksync_domain::{Result, ThanksyncError};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG` (or `LOG_LEVEL`) to set the filter and falls back to
/// `default_level` if neither is set.
///
/// # Errors
/// Returns `ThanksyncError::Internal` if a global subscriber is already
/// installed.
pub fn init_tracing(default_level: &str, json: bool) -> Result<()> {
    let filter = env_filter(default_level);
    let builder = fmt().with_env_filter(filter).with_target(true);

    let installed = if json { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|err| ThanksyncError::Internal(format!("tracing init failed: {err}")))
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}
