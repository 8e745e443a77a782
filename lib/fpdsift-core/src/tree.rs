//! Helpers over the data tree being filtered.
//!
//! The tree itself is a plain [`serde_json::Value`]. This module adds the two
//! things the filters need on top of it: the emptiness rule deciding whether a
//! value still carries data, and [`DataPath`], the label used in diagnostics.

use std::fmt;

use serde_json::Value;

/// Returns `true` when the value counts as absent for filtering purposes.
///
/// - objects and arrays are empty when they have no entries
/// - numbers are never empty, `0` is a present value
/// - strings are empty when they have no characters
/// - `false` and `null` are empty, `true` is not
///
/// # Example
///
/// ```rust
/// use fpdsift_core::is_empty_data;
/// use serde_json::json;
///
/// assert!(is_empty_data(&json!({})));
/// assert!(is_empty_data(&json!("")));
/// assert!(!is_empty_data(&json!(0)));
/// assert!(!is_empty_data(&json!(["a"])));
/// ```
#[must_use]
pub fn is_empty_data(value: &Value) -> bool {
    match value {
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Number(_) => false,
        Value::String(text) => text.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Null => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the data tree, e.g. `user.data[0].segment`.
///
/// Paths are cheap to extend: [`key`](Self::key) and [`index`](Self::index)
/// return a new path and leave the receiver untouched, so each recursion level
/// keeps its own label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DataPath {
    segments: Vec<PathSegment>,
}

impl DataPath {
    /// The empty path, pointing at a partition root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended with an object key.
    #[must_use]
    pub fn key(&self, name: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Key(name.into()))
    }

    /// Returns this path extended with an array index.
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.with_segment(PathSegment::Index(position))
    }

    /// The index of the last segment, if the path ends inside an array.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        match self.segments.last() {
            Some(PathSegment::Index(position)) => Some(*position),
            _ => None,
        }
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(name) if position == 0 => write!(f, "{name}")?,
                PathSegment::Key(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
