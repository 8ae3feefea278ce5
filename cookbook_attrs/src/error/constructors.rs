//! Aggregation and inspection helpers for `AttrError`.

use std::sync::Arc;

use super::{AggregatedErrors, AttrError};
use crate::path::AttrPath;

impl AttrError {
    /// Collapse a list of shared errors into a single shared error.
    ///
    /// Returns `None` for an empty list; a lone error is returned as-is so
    /// callers keep matching on the original variant.
    #[must_use]
    pub fn collect_shared(mut errors: Vec<Arc<Self>>) -> Option<Arc<Self>> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Arc::new(Self::Aggregate(Box::new(AggregatedErrors::new(
                errors,
            ))))),
        }
    }

    /// Returns the attribute path the error concerns, when there is one.
    ///
    /// Aggregates report the path of their first path-carrying member.
    #[must_use]
    pub fn path(&self) -> Option<&AttrPath> {
        match self {
            Self::DuplicatePath { path }
            | Self::UnknownAttribute { path }
            | Self::StoreSealed { path }
            | Self::TypeMismatch { path, .. }
            | Self::InvalidChoice { path, .. } => Some(path),
            Self::Aggregate(errors) => errors.iter().find_map(Self::path),
            _ => None,
        }
    }

    /// Short, stable name of the error kind for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::DuplicatePath { .. } => "duplicate-path",
            Self::UnknownAttribute { .. } => "unknown-attribute",
            Self::StoreSealed { .. } => "store-sealed",
            Self::DuplicatePrecedence { .. } => "duplicate-precedence",
            Self::LayerStackSealed { .. } => "layer-stack-sealed",
            Self::TypeMismatch { .. } => "type-mismatch",
            Self::CyclicDefault { .. } => "cyclic-default",
            Self::InvalidChoice { .. } => "invalid-choice",
            Self::InvalidPath { .. } => "invalid-path",
            Self::InvalidKind { .. } => "invalid-kind",
            Self::InvalidLayer { .. } => "invalid-layer",
            Self::File { .. } => "file",
            Self::Gathering(_) => "gathering",
            Self::Aggregate(_) => "aggregate",
        }
    }
}
