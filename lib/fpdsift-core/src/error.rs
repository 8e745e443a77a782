/// Errors raised outside of the traversal itself.
///
/// Filtering never fails: rejected values are dropped and reported as
/// [`Diagnostic`](crate::Diagnostic)s. Errors only come from malformed input
/// at the top level or from documents that cannot be read.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum FpdError {
    /// The top-level data does not have the `{ global, bidder }` layout.
    #[display("Invalid input: {message}")]
    InvalidInput {
        /// What is wrong with the input.
        message: String,
    },

    /// A JSON document could not be deserialized.
    #[display("Failed to deserialize JSON at '{path}': {error}")]
    JsonError {
        /// Path to the offending value inside the document.
        path: String,
        /// The underlying error.
        #[error(source)]
        error: serde_json::Error,
    },

    /// A JSON document could not be serialized.
    #[display("Failed to serialize JSON: {_0}")]
    JsonRenderError(serde_json::Error),

    /// A YAML document could not be read or written.
    #[cfg(feature = "yaml")]
    #[display("YAML error: {message}")]
    YamlError {
        /// The underlying error message.
        message: String,
    },
}

impl FpdError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
