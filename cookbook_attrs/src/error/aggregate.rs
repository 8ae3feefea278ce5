//! Aggregation container and iteration support for multiple `AttrError` values.

use std::{error::Error, fmt, sync::Arc};

use super::AttrError;

/// Collection of [`AttrError`]s produced during a single load attempt.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cookbook_attrs::{AttrError, AttrPath};
/// let path = AttrPath::parse("rvm/branch").expect("valid path");
/// let e = AttrError::collect_shared(vec![
///     Arc::new(AttrError::UnknownAttribute { path: path.clone() }),
///     Arc::new(AttrError::DuplicatePath { path }),
/// ])
/// .expect("two errors");
/// if let AttrError::Aggregate(agg) = e.as_ref() {
///     assert_eq!(agg.len(), 2);
/// }
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<AttrError>>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<Arc<AttrError>>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &AttrError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the aggregation holds no errors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl<'a> IntoIterator for &'a AggregatedErrors {
    type Item = &'a AttrError;
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, Arc<AttrError>>,
        fn(&'a Arc<AttrError>) -> &'a AttrError,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(Arc::as_ref)
    }
}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<AttrError>;
    type IntoIter = std::vec::IntoIter<Arc<AttrError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
