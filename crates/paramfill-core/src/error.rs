//! Error handling for the paramfill library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Malformed array and object schemas are not errors: the resolver recovers
//! from them locally with an empty sequence or an empty object.
//!
//! # Examples
//!
//! ```
//! use paramfill_core::error::{Error, Result};
//!
//! fn lookup(reference: &str) -> Result<()> {
//!     Err(Error::dereference(reference, "definition not found"))
//! }
//!
//! assert!(lookup("#/definitions/Missing").is_err());
//! ```

use thiserror::Error;

/// Result type for paramfill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for paramfill operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Failure while fetching a remote document
    #[error("HTTP error: {0}")]
    Http(String),

    /// Malformed OpenAPI document
    #[error("OpenAPI error: {0}")]
    OpenApi(String),

    /// A `$ref` pointer could not be resolved against the document
    #[error("Unable to dereference '{reference}': {reason}")]
    Dereference { reference: String, reason: String },

    /// No value could be built for a model parameter
    #[error("Parameter resolution error: {0}")]
    ParameterResolution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new OpenAPI error
    pub fn openapi<S: Into<String>>(msg: S) -> Self {
        Self::OpenApi(msg.into())
    }

    /// Create a new dereference error for `reference`
    pub fn dereference<R: Into<String>, S: Into<String>>(reference: R, reason: S) -> Self {
        Self::Dereference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a new parameter resolution error
    pub fn parameter_resolution<S: Into<String>>(msg: S) -> Self {
        Self::ParameterResolution(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}
