//! Diagnostics emitted for every value the filter drops.
//!
//! Dropping data is never an error: each rejection produces one
//! [`Diagnostic`], handed to a [`DiagnosticSink`] chosen by the caller. The
//! sink never influences what is kept.
//!
//! The trait is implemented for:
//!
//! - `Vec<Diagnostic>`, collecting everything (handy in tests)
//! - any `FnMut(Diagnostic)`
//! - [`TracingSink`], logging each diagnostic as a `WARN` event
//!
//! # Example
//!
//! ```rust
//! use fpdsift_core::{Diagnostic, DiagnosticSink, DataPath, Reason};
//!
//! let mut seen: Vec<Diagnostic> = Vec::new();
//! seen.report(Diagnostic::new(DataPath::root().key("imp"), Reason::InvalidProperty));
//!
//! assert_eq!(seen[0].to_string(), "Filtered imp: invalid property");
//! ```

use tracing::warn;

use crate::schema::{FieldDescriptor, ShapeKind};
use crate::tree::DataPath;

/// The type announced in an "expected type" diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Expected {
    /// The field was declared as an array.
    #[display("array")]
    Array,
    /// The field (or element) was declared with this kind.
    #[display("{_0}")]
    Kind(ShapeKind),
}

impl Expected {
    /// The expectation announced when a field fails its type check.
    #[must_use]
    pub fn of_field(descriptor: &FieldDescriptor) -> Self {
        if descriptor.is_array {
            Self::Array
        } else {
            Self::Kind(descriptor.kind)
        }
    }
}

/// Why a value was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Reason {
    /// A required field was absent or empty.
    #[display("missing required property {name}")]
    MissingRequired {
        /// Name of the required field.
        name: String,
    },

    /// The schema marks the field as invalid.
    #[display("invalid property")]
    InvalidProperty,

    /// The value does not have the declared shape.
    #[display("expected type {_0}")]
    ExpectedType(Expected),

    /// The field is redacted because the visitor opted out.
    #[display("pubcid optout found")]
    OptOut,

    /// Nothing was left once the value was filtered.
    #[display("empty data found")]
    EmptyData,

    /// The value lies deeper than the configured limit.
    #[display("maximum depth {limit} exceeded")]
    DepthExceeded {
        /// The configured maximum depth.
        limit: usize,
    },
}

/// A dropped value: where it was and why it went.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("Filtered {path}: {reason}")]
pub struct Diagnostic {
    /// Location of the dropped value.
    pub path: DataPath,
    /// Why it was dropped.
    pub reason: Reason,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(path: DataPath, reason: Reason) -> Self {
        Self { path, reason }
    }

    /// The array index of the dropped value, for array elements.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.path.last_index()
    }
}

/// Receives the diagnostics of a filtering run.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic),
{
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic);
    }
}

/// Logs every diagnostic with [`tracing::warn!`].
///
/// The event carries the `path` and `reason` as fields, the message is the
/// rendered diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!(path = %diagnostic.path, reason = %diagnostic.reason, "{diagnostic}");
    }
}
