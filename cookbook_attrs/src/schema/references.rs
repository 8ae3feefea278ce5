//! Load-time validation of default references.

use std::collections::HashMap;
use std::sync::Arc;

use super::SchemaStore;
use crate::path::AttrPath;
use crate::{AttrError, AttrResult};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Active,
    Done,
}

impl SchemaStore {
    /// Verify that every default reference targets a declared attribute and
    /// that references never loop.
    ///
    /// All problems are reported together; each cycle appears once, written as
    /// the chain that closes it (`a -> b -> a`).
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::UnknownAttribute`] for dangling references,
    /// [`AttrError::CyclicDefault`] for loops, or [`AttrError::Aggregate`]
    /// when several problems are found.
    pub fn check_references(&self) -> AttrResult<()> {
        let mut errors: Vec<Arc<AttrError>> = self
            .iter()
            .flat_map(|decl| decl.default().map(super::DefaultExpr::references).unwrap_or_default())
            .filter(|target| !self.contains(target))
            .map(|target| {
                Arc::new(AttrError::UnknownAttribute {
                    path: target.clone(),
                })
            })
            .collect();

        let mut state = HashMap::new();
        let mut stack = Vec::new();
        for decl in self {
            self.visit(decl.path(), &mut state, &mut stack, &mut errors);
        }

        AttrError::collect_shared(errors).map_or(Ok(()), Err)
    }

    fn visit<'a>(
        &'a self,
        path: &'a AttrPath,
        state: &mut HashMap<&'a AttrPath, Visit>,
        stack: &mut Vec<&'a AttrPath>,
        errors: &mut Vec<Arc<AttrError>>,
    ) {
        match state.get(path) {
            Some(Visit::Done) => return,
            Some(Visit::Active) => {
                let start = stack.iter().position(|entry| *entry == path).unwrap_or(0);
                let mut cycle: Vec<String> = stack
                    .get(start..)
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                cycle.push(path.to_string());
                errors.push(Arc::new(AttrError::CyclicDefault {
                    cycle: cycle.join(" -> "),
                }));
                return;
            }
            None => {}
        }

        state.insert(path, Visit::Active);
        stack.push(path);
        let targets = self
            .declarations
            .get(path)
            .and_then(|decl| decl.default())
            .map(super::DefaultExpr::references)
            .unwrap_or_default();
        for target in targets {
            if let Some((declared, _)) = self.declarations.get_key_value(target) {
                self.visit(declared, state, stack, errors);
            }
        }
        stack.pop();
        state.insert(path, Visit::Done);
    }
}
