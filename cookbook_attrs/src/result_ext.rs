//! Extensions for mapping errors to `AttrResult` concisely.
//!
//! - Use [`AttrResultExt::into_attr`] for error types that implement
//!   `Into<AttrError>` (e.g., `serde_json::Error`, `figment::Error`).
//! - Use [`ResultIntoFigment::to_figment`] inside `figment::Jail` closures,
//!   which must return figment's own error type.
//!
//! # Examples
//!
//! ```
//! use cookbook_attrs::{AttrResult, AttrResultExt};
//!
//! fn serialize() -> AttrResult<serde_json::Value> {
//!     serde_json::to_value(["ruby-2.0.0"]).into_attr()
//! }
//! # assert!(serialize().is_ok());
//! ```

use std::sync::Arc;

use crate::{AttrError, AttrResult};

/// Map any `Result<T, E>` with `E: Into<AttrError>` into an `AttrResult<T>`.
pub trait AttrResultExt<T, E> {
    /// Convert `Result<T, E>` into `AttrResult<T>` using `Into<AttrError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<AttrError>`.
    fn into_attr(self) -> AttrResult<T>;
}

impl<T, E> AttrResultExt<T, E> for Result<T, E>
where
    E: Into<AttrError>,
{
    fn into_attr(self) -> AttrResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Convert shared attribute errors into `figment::Error`, keeping the message.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for Arc<AttrError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

impl IntoFigmentError for &Arc<AttrError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

/// Convert `AttrResult<T>` into `Result<T, figment::Error>`.
#[expect(
    clippy::result_large_err,
    reason = "figment::Error is large; this helper only bridges into figment::Jail closures"
)]
pub trait ResultIntoFigment<T> {
    /// Map the error through [`IntoFigmentError`].
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` containing the original message.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for AttrResult<T> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(IntoFigmentError::into_figment)
    }
}
