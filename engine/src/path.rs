//! Structured addresses of nodes inside a form tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step from a composite node to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object member.
    Key(String),
    /// Array slot.
    Index(usize),
}

/// Address of a node, from the form root down.
///
/// The empty path is the root object.
///
/// # Examples
///
/// ```
/// use schema_forms_engine::FieldPath;
///
/// let path = FieldPath::root().key("people").index(2).key("first");
/// assert_eq!(path.to_string(), "people[2].first");
/// assert_eq!(path.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Appends an object member step.
    pub fn key(mut self, key: &str) -> Self {
        self.0.push(PathSegment::Key(key.to_string()));
        self
    }

    /// Appends an array slot step.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    /// Returns a copy extended by `segment`.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.0.push(segment);
        path
    }

    /// The steps of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
