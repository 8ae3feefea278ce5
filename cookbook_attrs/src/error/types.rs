//! Primary error enum for schema, layer and resolution flows.

use figment::Error as FigmentError;
use thiserror::Error;

use super::aggregate::AggregatedErrors;
use crate::path::AttrPath;
use crate::value::AttributeKind;

/// Errors that can occur while loading or resolving attributes.
///
/// Every variant reflects a structural or configuration defect, so none of
/// them are retried internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttrError {
    /// An attribute with the same path was already registered.
    #[error("attribute '{path}' is already declared")]
    DuplicatePath {
        /// Path registered twice.
        path: AttrPath,
    },

    /// The requested attribute has no declaration.
    #[error("unknown attribute '{path}'")]
    UnknownAttribute {
        /// Path that was looked up.
        path: AttrPath,
    },

    /// Registration attempted after the schema store was sealed.
    #[error("cannot declare '{path}': the schema store is sealed")]
    StoreSealed {
        /// Path of the rejected declaration.
        path: AttrPath,
    },

    /// Two override layers claim the same precedence.
    #[error(
        "layer '{incoming}' uses precedence {precedence}, already taken by layer '{existing}'"
    )]
    DuplicatePrecedence {
        /// Contested precedence rank.
        precedence: i32,
        /// Name of the layer already holding the rank.
        existing: String,
        /// Name of the rejected layer.
        incoming: String,
    },

    /// A layer was pushed after the stack was sealed.
    #[error("cannot push layer '{layer}': the layer stack is sealed")]
    LayerStackSealed {
        /// Name of the rejected layer.
        layer: String,
    },

    /// A raw value does not fit the declared kind.
    #[error("type mismatch for '{path}': expected {expected}, got {got}")]
    TypeMismatch {
        /// Attribute being coerced.
        path: AttrPath,
        /// Declared kind of the attribute.
        expected: AttributeKind,
        /// Kind of the raw value that was supplied.
        got: &'static str,
    },

    /// Default references loop back onto an attribute already being resolved.
    #[error("cyclic default reference: {cycle}")]
    CyclicDefault {
        /// Chain of attribute paths participating in the cycle.
        cycle: String,
    },

    /// A resolved value is not one of the declared choices.
    #[error("value {value} is not an allowed choice for '{path}'")]
    InvalidChoice {
        /// Attribute carrying the choice list.
        path: AttrPath,
        /// Rendered value that was rejected.
        value: String,
    },

    /// An attribute path could not be parsed.
    #[error("invalid attribute path '{path}': {reason}")]
    InvalidPath {
        /// Raw path text.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// A manifest record named an unsupported kind.
    #[error("attribute '{path}' declares unsupported kind '{kind}'")]
    InvalidKind {
        /// Raw path of the record.
        path: String,
        /// Kind text that was not recognised.
        kind: String,
    },

    /// A layer's data could not be used as an entry tree.
    #[error("invalid layer '{layer}': {message}")]
    InvalidLayer {
        /// Name of the offending layer.
        layer: String,
        /// Human-readable explanation.
        message: String,
    },

    /// Error originating from a manifest or layer file.
    #[error("file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while gathering data from figment providers.
    #[error("failed to gather attribute data: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Multiple errors occurred during a single load or resolution pass.
    #[error("multiple attribute errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
