//! Trait-based conversions between external error types and `AttrError`.

use figment::Error as FigmentError;

use super::AttrError;

/// Convert JSON encoding or decoding failures into [`AttrError::Gathering`].
impl From<serde_json::Error> for AttrError {
    fn from(e: serde_json::Error) -> Self {
        Self::Gathering(Box::new(FigmentError::from(format!(
            "JSON error: {} at line {}, column {}",
            e,
            e.line(),
            e.column()
        ))))
    }
}

impl From<FigmentError> for AttrError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(e.into())
    }
}
