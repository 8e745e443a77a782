//! The filtering algorithms.
//!
//! [`FieldFilter`] walks a data tree against a [`Schema`] and rebuilds it with
//! only the values that conform:
//!
//! - [`FieldFilter::filter_object`] keeps the fields of an object that are not
//!   invalid, have the declared type, are not redacted, and still carry data
//!   once filtered themselves
//! - [`FieldFilter::filter_array`] keeps the elements of an array that have the
//!   declared element type, carry their required fields, and survive the
//!   recursive filtering of their own fields
//!
//! Both recurse into each other. Input is never mutated; every level returns
//! freshly built values.

use serde_json::Value;
use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Reason};
use crate::schema::{Shape, ShapeKind};
use crate::tree::DataPath;

mod array;
mod object;
mod required;

/// Whether `value` has the given shape.
///
/// - `string` accepts strings
/// - `number` accepts finite numbers
/// - `object` accepts objects when `is_array` is false, arrays when it is true
/// - an unknown kind accepts nothing
///
/// # Example
///
/// ```rust
/// use fpdsift_core::{Shape, ShapeKind, type_check};
/// use serde_json::json;
///
/// let list = Shape::new(ShapeKind::Object, true);
/// assert!(type_check(&json!([1, 2]), list));
/// assert!(!type_check(&json!({"a": 1}), list));
/// ```
#[must_use]
pub fn type_check(value: &Value, shape: Shape) -> bool {
    match shape.kind {
        ShapeKind::String => value.is_string(),
        ShapeKind::Number => value.as_f64().is_some_and(f64::is_finite),
        ShapeKind::Object => match value {
            Value::Object(_) => !shape.is_array,
            Value::Array(_) => shape.is_array,
            _ => false,
        },
        ShapeKind::Unknown => false,
    }
}

/// State of one filtering run.
///
/// The redaction flag is captured when the filter is created and handed down
/// the whole traversal, so concurrent runs never share it.
pub struct FieldFilter<'a> {
    redact: bool,
    max_depth: usize,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> FieldFilter<'a> {
    /// Creates a filter for one run.
    pub fn new(redact: bool, max_depth: usize, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            redact,
            max_depth,
            sink,
        }
    }

    fn report(&mut self, path: DataPath, reason: Reason) {
        trace!(%path, %reason, "value dropped");
        self.sink.report(Diagnostic::new(path, reason));
    }

    /// Reports and returns `true` when descending to `depth` goes past the limit.
    fn too_deep(&mut self, depth: usize, path: &DataPath) -> bool {
        if depth <= self.max_depth {
            return false;
        }
        self.report(
            path.clone(),
            Reason::DepthExceeded {
                limit: self.max_depth,
            },
        );
        true
    }
}

impl std::fmt::Debug for FieldFilter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldFilter")
            .field("redact", &self.redact)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
