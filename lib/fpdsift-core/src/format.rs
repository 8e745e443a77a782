//! Reading and writing schema, configuration and data documents.
//!
//! JSON is always available. YAML requires the `yaml` feature.

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::FpdError;

/// The format of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum DocumentFormat {
    /// JSON document.
    #[default]
    #[display("json")]
    Json,
    /// YAML document.
    #[display("yaml")]
    Yaml,
}

impl DocumentFormat {
    /// Guesses the format from the file extension, JSON unless it ends with
    /// `.yml` or `.yaml`.
    ///
    /// ```rust
    /// use fpdsift_core::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::from_path("schema.yaml"), DocumentFormat::Yaml);
    /// assert_eq!(DocumentFormat::from_path("fpd.json"), DocumentFormat::Json);
    /// ```
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Deserializes a document.
    ///
    /// # Errors
    ///
    /// Returns [`FpdError::JsonError`] with the path to the offending value for
    /// malformed JSON, a YAML error for malformed YAML (or when the `yaml`
    /// feature is disabled).
    pub fn parse<T>(self, input: &str) -> Result<T, FpdError>
    where
        T: DeserializeOwned,
    {
        match self {
            Self::Json => {
                let deserializer = &mut serde_json::Deserializer::from_str(input);
                serde_path_to_error::deserialize(deserializer).map_err(|err| {
                    let path = err.path().to_string();
                    FpdError::JsonError {
                        path,
                        error: err.into_inner(),
                    }
                })
            }
            Self::Yaml => parse_yaml(input),
        }
    }

    /// Serializes a document, pretty-printed.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in this format.
    pub fn render<T>(self, value: &T) -> Result<String, FpdError>
    where
        T: Serialize,
    {
        match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(FpdError::JsonRenderError),
            Self::Yaml => render_yaml(value),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = FpdError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(FpdError::invalid_input(format!(
                "unknown document format '{other}', expected json or yaml"
            ))),
        }
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml<T: DeserializeOwned>(input: &str) -> Result<T, FpdError> {
    serde_saphyr::from_str(input).map_err(|err| FpdError::YamlError {
        message: err.to_string(),
    })
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml<T: DeserializeOwned>(_input: &str) -> Result<T, FpdError> {
    Err(FpdError::invalid_input("YAML documents require the `yaml` feature"))
}

#[cfg(feature = "yaml")]
fn render_yaml<T: Serialize>(value: &T) -> Result<String, FpdError> {
    serde_saphyr::to_string(value).map_err(|err| FpdError::YamlError {
        message: err.to_string(),
    })
}

#[cfg(not(feature = "yaml"))]
fn render_yaml<T: Serialize>(_value: &T) -> Result<String, FpdError> {
    Err(FpdError::invalid_input("YAML documents require the `yaml` feature"))
}
