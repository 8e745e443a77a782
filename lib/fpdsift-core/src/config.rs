//! Run configuration.

use serde::{Deserialize, Serialize};

/// Default limit on the nesting depth the filter descends into.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration of a filtering run.
///
/// Every field is optional in the serialized form:
///
/// ```rust
/// use fpdsift_core::FpdConfig;
///
/// let config: FpdConfig = serde_json::from_str(r#"{"skipValidations": true}"#).unwrap();
/// assert!(config.skip_validations);
/// assert_eq!(config.max_depth, fpdsift_core::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FpdConfig {
    /// Return the data untouched, without any traversal or diagnostic.
    pub skip_validations: bool,
    /// Values nested deeper than this are dropped.
    pub max_depth: usize,
}

impl Default for FpdConfig {
    fn default() -> Self {
        Self {
            skip_validations: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FpdConfig {
    /// Enables or disables the validations.
    #[must_use]
    pub fn with_skip_validations(mut self, skip: bool) -> Self {
        self.skip_validations = skip;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
