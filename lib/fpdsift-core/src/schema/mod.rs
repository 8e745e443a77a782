//! The schema table: which shape is expected where.
//!
//! A [`Schema`] maps field names to [`FieldDescriptor`]s. Nested objects carry
//! their own schema in [`FieldDescriptor::children`], so the table is a tree
//! that mirrors the data it describes:
//!
//! ```json
//! {
//!   "user": {
//!     "type": "object",
//!     "children": {
//!       "yob": { "type": "number", "optoutApplies": true },
//!       "data": { "type": "object", "isArray": true, "childType": "object" }
//!     }
//!   }
//! }
//! ```
//!
//! Fields missing from the table are never rejected: the schema is a filter,
//! not a whitelist.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

mod descriptor;
pub mod ortb2;

pub use self::descriptor::{FieldDescriptor, Shape, ShapeKind};

/// An ordered table of field descriptors, one nesting level of the schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field descriptor.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// The descriptor of a field at this level.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// The descriptor found by walking `path` through nested `children`.
    ///
    /// ```rust
    /// use fpdsift_core::{SchemaPath, ortb2};
    ///
    /// let path: SchemaPath = "user.data.segment".parse().unwrap();
    /// let segment = ortb2::schema().lookup(&path).unwrap();
    /// assert_eq!(segment.required, vec!["id".to_string()]);
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &SchemaPath) -> Option<&FieldDescriptor> {
        let (last, parents) = path.segments.split_last()?;
        let mut current = self;
        for name in parents {
            current = current.field(name)?.children.as_ref()?;
        }
        current.field(last)
    }

    /// Iterates over the fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    /// The number of fields at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether this level declares no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDescriptor)> for Schema {
    fn from_iter<T: IntoIterator<Item = (K, FieldDescriptor)>>(iter: T) -> Self {
        let fields = iter
            .into_iter()
            .map(|(name, descriptor)| (name.into(), descriptor))
            .collect();
        Self { fields }
    }
}

/// A structured path to a field in the schema, e.g. `user.data`.
///
/// Each segment is a field name; descending into a segment means descending
/// into that field's `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// The empty path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended with a field name.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }
}

impl FromStr for SchemaPath {
    type Err = std::convert::Infallible;

    fn from_str(dotted: &str) -> Result<Self, Self::Err> {
        let segments = dotted
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { segments })
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::new().with_field(
            "user",
            FieldDescriptor::object().with_children(
                Schema::new()
                    .with_field("yob", FieldDescriptor::number())
                    .with_field(
                        "data",
                        FieldDescriptor::array_of(ShapeKind::Object).with_children(
                            Schema::new().with_field("name", FieldDescriptor::string()),
                        ),
                    ),
            ),
        )
    }

    #[test]
    fn should_lookup_nested_descriptor() {
        let schema = sample();
        let path: SchemaPath = "user.data.name".parse().expect("infallible");

        let descriptor = schema.lookup(&path).expect("should find user.data.name");
        assert_eq!(descriptor.kind, ShapeKind::String);
    }

    #[test]
    fn should_not_find_missing_path() {
        let schema = sample();

        assert!(schema.lookup(&SchemaPath::root()).is_none());
        assert!(schema.lookup(&SchemaPath::root().child("device")).is_none());
        assert!(
            schema
                .lookup(&SchemaPath::root().child("user").child("yob").child("deeper"))
                .is_none()
        );
    }

    #[test]
    fn should_round_trip_path_display() {
        let path = SchemaPath::root().child("site").child("content").child("data");
        insta::assert_snapshot!(path, @"site.content.data");

        let parsed: SchemaPath = "site.content.data".parse().expect("infallible");
        assert_eq!(parsed, path);
    }

    #[test]
    fn should_load_nested_table() {
        let schema: Schema = serde_json::from_value(json!({
            "user": {
                "type": "object",
                "children": {
                    "yob": {"type": "number", "optoutApplies": true}
                }
            },
            "imp": {"invalid": true}
        }))
        .expect("should deserialize");

        assert_eq!(schema.len(), 2);
        let yob = schema
            .lookup(&"user.yob".parse().expect("infallible"))
            .expect("user.yob");
        assert!(yob.redact_on_opt_out);
        assert!(schema.field("imp").is_some_and(|imp| imp.invalid));
        let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["user", "imp"]);
    }
}
