//! Attribute paths such as `rvm/default_ruby`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{AttrError, AttrResult};

/// Ordered, non-empty sequence of path segments identifying an attribute.
///
/// Paths parse from slash-delimited text (`rvm/vagrant/system_chef_solo`).
/// When the text contains no slash, dots act as the delimiter
/// (`rvm.default_ruby`). Paths always display slash-delimited.
///
/// # Examples
///
/// ```
/// use cookbook_attrs::AttrPath;
///
/// let slashed = AttrPath::parse("rvm/default_ruby")?;
/// let dotted = AttrPath::parse("rvm.default_ruby")?;
/// assert_eq!(slashed, dotted);
/// assert_eq!(slashed.to_string(), "rvm/default_ruby");
/// assert_eq!(slashed.segments(), ["rvm", "default_ruby"]);
/// # Ok::<_, std::sync::Arc<cookbook_attrs::AttrError>>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttrPath {
    segments: Vec<String>,
}

impl AttrPath {
    /// Build a path from pre-split segments.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidPath`] when there are no segments or a
    /// segment is blank.
    pub fn new<I, S>(segments: I) -> AttrResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collected: Vec<String> = segments.into_iter().map(Into::into).collect();
        if collected.is_empty() {
            return Err(invalid(String::new(), "path has no segments"));
        }
        if collected.iter().any(|segment| segment.trim().is_empty()) {
            return Err(invalid(collected.join("/"), "path contains an empty segment"));
        }
        Ok(Self {
            segments: collected,
        })
    }

    /// Parse a slash- or dot-delimited path.
    ///
    /// # Errors
    ///
    /// Returns [`AttrError::InvalidPath`] for empty input or empty segments
    /// (for example `rvm//branch`).
    pub fn parse(raw: &str) -> AttrResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid(raw.to_owned(), "path is empty"));
        }
        let delimiter = if trimmed.contains('/') { '/' } else { '.' };
        let segments: Vec<&str> = trimmed.split(delimiter).collect();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(invalid(raw.to_owned(), "path contains an empty segment"));
        }
        Ok(Self {
            segments: segments.into_iter().map(str::to_owned).collect(),
        })
    }

    /// Segments in order, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.segments.len()
    }
}

fn invalid(path: String, reason: &'static str) -> Arc<AttrError> {
    Arc::new(AttrError::InvalidPath { path, reason })
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for AttrPath {
    type Err = Arc<AttrError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AttrPath {
    type Error = Arc<AttrError>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AttrPath {
    type Error = Arc<AttrError>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AttrPath> for String {
    fn from(value: AttrPath) -> Self {
        value.to_string()
    }
}
