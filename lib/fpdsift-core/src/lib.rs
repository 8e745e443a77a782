//! # fpdsift core
//!
//! Schema-driven filtering of first-party data before it reaches bidders.
//!
//! First-party data is a free-form JSON tree supplied by a publisher
//! (`site`, `user`, `device`, ...). Before it is handed out, every value is
//! checked against a [`Schema`] and anything that does not conform is
//! dropped:
//!
//! - fields declared `invalid` (they must never be set by the publisher)
//! - values whose type does not match their descriptor
//! - array elements missing one of their required fields
//! - fields marked `redactOnOptOut` when the user opted out
//! - anything left empty once its content has been filtered
//!
//! Fields the schema does not describe are kept as they are. Each dropped
//! value produces a [`Diagnostic`] naming its path and the reason.
//!
//! ## Quick Start
//!
//! ```rust
//! use fpdsift_core::{FirstPartyData, FpdConfig, OptOutSignal, process_fpd};
//! use serde_json::json;
//!
//! let data = FirstPartyData::try_from(&json!({
//!     "global": {
//!         "site": {"name": "example", "cat": ["IAB1", 12]},
//!         "user": {"yob": 1985, "gender": "f"}
//!     },
//!     "bidder": {}
//! }))?;
//!
//! let opt_out = OptOutSignal::from_cookie_header("_pubcid_optout=1; theme=dark");
//! let filtered = process_fpd(FpdConfig::default(), &data, &opt_out);
//!
//! assert_eq!(filtered.global, json!({"site": {"name": "example", "cat": ["IAB1"]}}));
//! # Ok::<(), fpdsift_core::FpdError>(())
//! ```
//!
//! ## Custom schemas
//!
//! [`ortb2::schema`] describes the ORTB2 fields. Any other [`Schema`] can be
//! built in code or deserialized from JSON (or YAML with the `yaml` feature)
//! and used through [`FpdValidator::new`].
//!
//! ## Diagnostics
//!
//! Diagnostics go to a [`DiagnosticSink`]: collect them in a
//! `Vec<Diagnostic>`, handle them with a closure, or log them with
//! [`TracingSink`].

mod config;
mod diagnostics;
mod engine;
mod error;
mod format;
mod optout;
mod schema;
mod tree;
mod validate;

pub use self::config::{DEFAULT_MAX_DEPTH, FpdConfig};
pub use self::diagnostics::{Diagnostic, DiagnosticSink, Expected, Reason, TracingSink};
pub use self::engine::{FirstPartyData, FpdValidator, process_fpd};
pub use self::error::FpdError;
pub use self::format::DocumentFormat;
pub use self::optout::{OptOutSignal, PUBCID_OPTOUT_KEY, RedactionSource};
pub use self::schema::{FieldDescriptor, Schema, SchemaPath, Shape, ShapeKind, ortb2};
pub use self::tree::{DataPath, is_empty_data};
pub use self::validate::{FieldFilter, type_check};
