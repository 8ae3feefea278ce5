//! Error types for `attrctl`.

use std::sync::Arc;

use cookbook_attrs::AttrError;
use thiserror::Error;

/// Errors surfaced by the `attrctl` pipeline.
#[derive(Debug, Error)]
pub enum AttrctlError {
    /// Loading or resolving attributes failed.
    #[error(transparent)]
    Attributes(#[from] Arc<AttrError>),

    /// Output could not be encoded as JSON.
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
