//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::AttrctlError;

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `debug`
/// when `verbose` is set and `warn` otherwise.
///
/// # Errors
///
/// Returns [`AttrctlError::Logging`] when the filter is invalid or a global
/// subscriber is already installed.
pub fn init(verbose: bool) -> Result<(), AttrctlError> {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|err| AttrctlError::Logging(err.to_string()))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr).compact())
        .try_init()
        .map_err(|err| AttrctlError::Logging(err.to_string()))
}
