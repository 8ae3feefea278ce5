//! The attribute schema store.
//!
//! Declarations are registered during initialization and the store is then
//! sealed. A sealed store is read-only and can be shared across threads.

mod declaration;
mod default;
mod references;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use declaration::{AttributeDeclaration, Requirement};
pub use default::{DefaultExpr, parse_reference};

use crate::path::AttrPath;
use crate::{AttrError, AttrResult};

/// Registry of attribute declarations keyed by path.
#[derive(Debug, Default)]
pub struct SchemaStore {
    declarations: BTreeMap<AttrPath, AttributeDeclaration>,
    sealed: bool,
}

impl SchemaStore {
    /// Create an empty, unsealed store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: BTreeMap::new(),
            sealed: false,
        }
    }

    /// Register a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::StoreSealed`] once [`Self::seal`] has been called
    /// and [`AttrError::DuplicatePath`] when the path is already declared.
    pub fn register(&mut self, declaration: AttributeDeclaration) -> AttrResult<()> {
        let path = declaration.path().clone();
        if self.sealed {
            return Err(Arc::new(AttrError::StoreSealed { path }));
        }
        if self.declarations.contains_key(&path) {
            return Err(Arc::new(AttrError::DuplicatePath { path }));
        }
        tracing::debug!(path = %path, kind = %declaration.kind(), "declared attribute");
        self.declarations.insert(path, declaration);
        Ok(())
    }

    /// Look up a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::UnknownAttribute`] when `path` is not declared.
    pub fn get(&self, path: &AttrPath) -> AttrResult<&AttributeDeclaration> {
        self.declarations.get(path).ok_or_else(|| {
            Arc::new(AttrError::UnknownAttribute { path: path.clone() })
        })
    }

    /// Whether `path` is declared.
    #[must_use]
    pub fn contains(&self, path: &AttrPath) -> bool {
        self.declarations.contains_key(path)
    }

    /// Freeze the store; later registrations fail.
    pub fn seal(&mut self) {
        if !self.sealed {
            tracing::debug!(attributes = self.declarations.len(), "sealed schema store");
        }
        self.sealed = true;
    }

    /// Whether [`Self::seal`] has been called.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether the store has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDeclaration> {
        self.declarations.values()
    }
}

impl<'a> IntoIterator for &'a SchemaStore {
    type Item = &'a AttributeDeclaration;
    type IntoIter = std::collections::btree_map::Values<'a, AttrPath, AttributeDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.values()
    }
}
