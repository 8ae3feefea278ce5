//! Error constructors shared by file loading helpers.

use std::error::Error;
use std::sync::Arc;

use camino::Utf8Path;

use crate::AttrError;

/// Construct an [`AttrError::File`] for a manifest or layer path.
pub(super) fn file_error(
    path: &Utf8Path,
    err: impl Into<Box<dyn Error + Send + Sync>>,
) -> Arc<AttrError> {
    Arc::new(AttrError::File {
        path: path.as_std_path().to_path_buf(),
        source: err.into(),
    })
}

pub(super) fn invalid_data(path: &Utf8Path, msg: impl Into<String>) -> Arc<AttrError> {
    file_error(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()),
    )
}
