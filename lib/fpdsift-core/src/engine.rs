//! Entry point: filter a whole first-party data record.
//!
//! The record has two partitions: `global`, shared by every bidder, and
//! `bidder`, one tree per bidder name. Each tree is filtered independently,
//! starting from the root of the schema.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::FpdConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::FpdError;
use crate::optout::RedactionSource;
use crate::schema::{Schema, ortb2};
use crate::tree::DataPath;
use crate::validate::FieldFilter;

/// First-party data split into its global and per-bidder partitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstPartyData {
    /// Data shared by every bidder.
    #[serde(default)]
    pub global: Value,
    /// Data for one bidder, by bidder name.
    #[serde(default)]
    pub bidder: IndexMap<String, Value>,
}

impl FirstPartyData {
    /// Creates a record from its partitions.
    #[must_use]
    pub fn new(global: Value, bidder: IndexMap<String, Value>) -> Self {
        Self { global, bidder }
    }
}

impl TryFrom<&Value> for FirstPartyData {
    type Error = FpdError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Some(record) = value.as_object() else {
            return Err(FpdError::invalid_input(
                "first-party data must be an object with `global` and `bidder`",
            ));
        };

        let bidder = match record.get("bidder") {
            None | Some(Value::Null) => IndexMap::new(),
            Some(Value::Object(bidders)) => bidders
                .iter()
                .map(|(name, data)| (name.clone(), data.clone()))
                .collect(),
            Some(other) => {
                return Err(FpdError::invalid_input(format!(
                    "`bidder` must be an object keyed by bidder name, got {other}"
                )));
            }
        };
        let global = record.get("global").cloned().unwrap_or(Value::Null);

        Ok(Self { global, bidder })
    }
}

impl From<FirstPartyData> for Value {
    fn from(data: FirstPartyData) -> Self {
        let bidder = data.bidder.into_iter().collect();
        serde_json::json!({
            "global": data.global,
            "bidder": Value::Object(bidder),
        })
    }
}

/// Filters first-party data against a schema.
///
/// The validator only holds shared references, so one instance can serve
/// concurrent runs: the redaction flag belongs to each run, not to the
/// validator.
///
/// # Example
///
/// ```rust
/// use fpdsift_core::{Diagnostic, FirstPartyData, FpdConfig, FpdValidator};
/// use serde_json::json;
///
/// let validator = FpdValidator::ortb2(FpdConfig::default());
/// let data = FirstPartyData::try_from(&json!({
///     "global": {"user": {"yob": 1985, "keywords": "rust"}, "imp": []},
///     "bidder": {"exampleBidder": {"device": {"w": "wide", "h": 600}}}
/// }))?;
///
/// let mut diagnostics: Vec<Diagnostic> = Vec::new();
/// let filtered = validator.process(&data, &true, &mut diagnostics);
///
/// assert_eq!(filtered.global, json!({"user": {"keywords": "rust"}}));
/// assert_eq!(filtered.bidder["exampleBidder"], json!({"device": {"h": 600}}));
/// assert_eq!(diagnostics.len(), 3);
/// # Ok::<(), fpdsift_core::FpdError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FpdValidator<'s> {
    schema: &'s Schema,
    config: FpdConfig,
}

impl<'s> FpdValidator<'s> {
    /// Creates a validator over the given schema.
    #[must_use]
    pub fn new(schema: &'s Schema, config: FpdConfig) -> Self {
        Self { schema, config }
    }

    /// The configuration of this validator.
    #[must_use]
    pub fn config(&self) -> FpdConfig {
        self.config
    }

    /// Filters the whole record.
    ///
    /// The redaction flag is read once from `redaction`. With
    /// [`skip_validations`](FpdConfig::skip_validations) set the record is
    /// returned as is, without traversal nor diagnostic.
    pub fn process<R>(
        &self,
        data: &FirstPartyData,
        redaction: &R,
        sink: &mut dyn DiagnosticSink,
    ) -> FirstPartyData
    where
        R: RedactionSource + ?Sized,
    {
        let redact = redaction.is_opted_out();
        if self.config.skip_validations {
            debug!("first-party data validations skipped");
            return data.clone();
        }
        debug!(
            redact,
            bidders = data.bidder.len(),
            "validating first-party data"
        );

        let global = self.filter_tree(&data.global, redact, sink);
        let bidder = data
            .bidder
            .iter()
            .map(|(name, tree)| (name.clone(), self.filter_tree(tree, redact, sink)))
            .collect();

        FirstPartyData { global, bidder }
    }

    /// Filters one partition from the root of the schema.
    ///
    /// Anything but an object yields an empty object.
    pub fn filter_tree(&self, tree: &Value, redact: bool, sink: &mut dyn DiagnosticSink) -> Value {
        let mut filter = FieldFilter::new(redact, self.config.max_depth, sink);
        let filtered = filter.filter_object(tree, Some(self.schema), &DataPath::root(), 0);
        Value::Object(filtered)
    }

    /// Filters a record given as a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FpdError::InvalidInput`] if the value is not an object or if
    /// its `bidder` entry is not an object.
    pub fn process_value<R>(
        &self,
        data: &Value,
        redaction: &R,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Value, FpdError>
    where
        R: RedactionSource + ?Sized,
    {
        let record = FirstPartyData::try_from(data)?;
        if self.config.skip_validations {
            return Ok(data.clone());
        }
        Ok(self.process(&record, redaction, sink).into())
    }
}

impl FpdValidator<'static> {
    /// Creates a validator over the built-in ORTB2 schema.
    #[must_use]
    pub fn ortb2(config: FpdConfig) -> Self {
        Self::new(ortb2::schema(), config)
    }
}

/// Filters a record against the built-in ORTB2 schema, logging diagnostics
/// with [`TracingSink`].
pub fn process_fpd<R>(config: FpdConfig, data: &FirstPartyData, redaction: &R) -> FirstPartyData
where
    R: RedactionSource + ?Sized,
{
    FpdValidator::ortb2(config).process(data, redaction, &mut TracingSink)
}
