//! Field descriptors: the shape and constraints expected for one field.

use serde::{Deserialize, Serialize};

use super::Schema;

/// The base shape of a field.
///
/// Any other `type` string found while loading a schema, as well as a missing
/// `type`, becomes [`ShapeKind::Unknown`], which never passes a type check.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// A JSON string.
    #[display("string")]
    String,
    /// A finite JSON number.
    #[display("number")]
    Number,
    /// A structured value, object or array depending on the array-ness.
    #[display("object")]
    Object,
    /// Anything the filter does not know how to check.
    #[default]
    #[serde(other)]
    #[display("unknown")]
    Unknown,
}

impl ShapeKind {
    fn is_unknown(&self) -> bool {
        *self == Self::Unknown
    }
}

/// A shape to check a value against: a kind and whether it is an array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    /// The expected base shape.
    pub kind: ShapeKind,
    /// Whether the value is expected to be an array.
    pub is_array: bool,
}

impl Shape {
    /// Creates a shape.
    #[must_use]
    pub fn new(kind: ShapeKind, is_array: bool) -> Self {
        Self { kind, is_array }
    }
}

/// Describes the expected shape and constraints of one field.
///
/// The serialized form uses the attribute names of the schema table format:
///
/// ```json
/// {
///   "type": "object",
///   "isArray": true,
///   "childType": "object",
///   "required": ["name", "segment"],
///   "children": { "name": { "type": "string" } }
/// }
/// ```
///
/// Descriptors are usually assembled with the builder methods:
///
/// ```rust
/// use fpdsift_core::{FieldDescriptor, Schema, ShapeKind};
///
/// let segment = FieldDescriptor::array_of(ShapeKind::Object)
///     .with_required(["id"])
///     .with_children(Schema::new().with_field("id", FieldDescriptor::string()));
///
/// assert!(segment.element_shape().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescriptor {
    /// The base shape.
    #[serde(rename = "type", skip_serializing_if = "ShapeKind::is_unknown")]
    pub kind: ShapeKind,
    /// Whether the field itself is an array.
    #[serde(skip_serializing_if = "is_false")]
    pub is_array: bool,
    /// Shape of each element when the field is an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_type: Option<ShapeKind>,
    /// Array-ness of each element when the field is an array.
    #[serde(alias = "childisArray", skip_serializing_if = "is_false")]
    pub child_is_array: bool,
    /// Nested schema applying to the field's object value (or array elements).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Schema>,
    /// Names that must be present and non-empty inside the field's value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// The field is always dropped.
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    /// The field is dropped while the redaction flag is active.
    #[serde(alias = "optoutApplies", skip_serializing_if = "is_false")]
    pub redact_on_opt_out: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !value
}

impl FieldDescriptor {
    /// A scalar string field.
    #[must_use]
    pub fn string() -> Self {
        Self::of(ShapeKind::String)
    }

    /// A scalar number field.
    #[must_use]
    pub fn number() -> Self {
        Self::of(ShapeKind::Number)
    }

    /// A plain object field.
    #[must_use]
    pub fn object() -> Self {
        Self::of(ShapeKind::Object)
    }

    /// An array field whose elements have the given kind.
    #[must_use]
    pub fn array_of(child: ShapeKind) -> Self {
        Self {
            kind: ShapeKind::Object,
            is_array: true,
            child_type: Some(child),
            ..Self::default()
        }
    }

    fn of(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Attaches the nested schema.
    #[must_use]
    pub fn with_children(mut self, children: Schema) -> Self {
        self.children = Some(children);
        self
    }

    /// Sets the required field names.
    #[must_use]
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the field as always invalid.
    #[must_use]
    pub fn with_invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    /// Marks the field as dropped on opt-out.
    #[must_use]
    pub fn with_redact_on_opt_out(mut self, redact: bool) -> Self {
        self.redact_on_opt_out = redact;
        self
    }

    /// Sets the array-ness expected for each element.
    #[must_use]
    pub fn with_child_is_array(mut self, child_is_array: bool) -> Self {
        self.child_is_array = child_is_array;
        self
    }

    /// The shape the field value itself is checked against.
    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape::new(self.kind, self.is_array)
    }

    /// The shape of each element, for array fields declaring a `childType`.
    #[must_use]
    pub fn element_shape(&self) -> Option<Shape> {
        if !self.is_array {
            return None;
        }
        self.child_type.map(|kind| Shape::new(kind, self.child_is_array))
    }

    /// Whether the field value is a plain (non-array) object.
    #[must_use]
    pub fn is_plain_object(&self) -> bool {
        self.kind == ShapeKind::Object && !self.is_array
    }
}
