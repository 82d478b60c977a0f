//! OpenAPI / Swagger document loading and operation extraction.
//!
//! This module provides functionality for loading specifications from files
//! or URLs, listing their operations and resolving local `$ref` pointers.
//!
//! # Examples
//!
//! ```no_run
//! use paramfill_core::openapi::OpenApiContext;
//! use paramfill_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let spec = OpenApiContext::from_file("swagger.json").await?;
//!
//! for operation in spec.parse_operations()? {
//!     println!("{} {} {}", operation.method, operation.path, operation.id);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::operation::{Operation, Parameter};
use crate::resolver::Dereference;
use crate::Error;

// External imports (alphabetized)
use serde_json::{json, Map, Value as JsonValue};
use tokio::fs;
use url::Url;

/// HTTP methods that can hold an operation in a path item.
const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

/// Represents an OpenAPI specification
#[derive(Debug)]
pub struct OpenApiContext {
    /// The raw JSON value of the OpenAPI spec
    pub json: JsonValue,
}

impl OpenApiContext {
    /// Load a specification from a file path or an HTTP(S) URL (YAML or JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> crate::Result<Self> {
        let location = location.as_ref();

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::from_url(location).await,
            _ => Self::from_file(location).await,
        }
    }

    /// Load a specification from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            Error::openapi(format!(
                "Failed to parse OpenAPI spec at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a specification from a URL (supports both YAML and JSON)
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        let response = reqwest::get(url).await?;

        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "Failed to fetch OpenAPI spec from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().await?;
        Self::parse_content(&content).map_err(|e| {
            Error::openapi(format!("Failed to parse OpenAPI spec from {}: {}", url, e))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> Result<Self, String> {
        if let Ok(json) = serde_json::from_str(content) {
            return Ok(Self { json });
        }

        if let Ok(json) = serde_yaml::from_str(content) {
            return Ok(Self { json });
        }

        Err("content is neither valid JSON nor YAML".to_string())
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// List every operation declared under `paths`.
    ///
    /// Parameters declared on the path item apply to all of its operations,
    /// the operation's own declaration wins on a name clash. An OpenAPI 3
    /// `requestBody` becomes a parameter named `body` located in `body`.
    pub fn parse_operations(&self) -> crate::Result<Vec<Operation>> {
        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::openapi("Missing 'paths' object"))?;

        let mut operations = Vec::new();
        for (path, item) in paths {
            let shared = self.extract_parameters(item)?;

            for method in HTTP_METHODS {
                let Some(method_item) = item.get(*method).and_then(JsonValue::as_object) else {
                    continue;
                };

                let operation_id = method_item
                    .get("operationId")
                    .and_then(JsonValue::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| {
                        format!(
                            "{}_{}",
                            method,
                            path.trim_start_matches('/').replace('/', "_")
                        )
                    });

                let mut specs = shared.clone();
                specs.extend(self.extract_parameters_from(method_item)?);
                if let Some(body) = method_item.get("requestBody") {
                    specs.extend(self.request_body_parameter(body)?);
                }

                let mut operation = Operation::new(operation_id, *method, path.clone());
                for spec in specs {
                    match Parameter::from_spec(spec) {
                        Some(param) => {
                            operation.params.insert(param.name.clone(), param);
                        }
                        None => log::warn!(
                            "Skipping parameter without a name in {} {}",
                            method,
                            path
                        ),
                    }
                }

                log::debug!(
                    "Found operation {} ({} parameters)",
                    operation.id,
                    operation.params.len()
                );
                operations.push(operation);
            }
        }

        Ok(operations)
    }

    /// Parameter objects declared on a path item or operation, `$ref`s resolved.
    pub fn extract_parameters(&self, item: &JsonValue) -> crate::Result<Vec<JsonValue>> {
        match item.as_object() {
            Some(fields) => self.extract_parameters_from(fields),
            None => Ok(Vec::new()),
        }
    }

    fn extract_parameters_from(&self, item: &Map<String, JsonValue>) -> crate::Result<Vec<JsonValue>> {
        let Some(parameters) = item.get("parameters").and_then(JsonValue::as_array) else {
            return Ok(Vec::new());
        };

        parameters
            .iter()
            .map(|param| match param.get("$ref").and_then(JsonValue::as_str) {
                Some(reference) => self.dereference(reference),
                None => Ok(param.clone()),
            })
            .collect()
    }

    /// The `body` parameter standing for an OpenAPI 3 request body.
    ///
    /// The `application/json` schema is preferred, otherwise the first media
    /// type's schema is used.
    fn request_body_parameter(&self, body: &JsonValue) -> crate::Result<Option<JsonValue>> {
        let body = match body.get("$ref").and_then(JsonValue::as_str) {
            Some(reference) => self.dereference(reference)?,
            None => body.clone(),
        };

        let Some(content) = body.get("content").and_then(JsonValue::as_object) else {
            return Ok(None);
        };

        let schema = content
            .get("application/json")
            .or_else(|| content.values().next())
            .and_then(|media| media.get("schema"));

        Ok(schema.map(|schema| {
            json!({
                "name": "body",
                "in": "body",
                "required": body.get("required").and_then(JsonValue::as_bool).unwrap_or(false),
                "schema": schema,
            })
        }))
    }
}

impl Dereference for OpenApiContext {
    /// Resolve a local pointer such as `#/definitions/Pet` or
    /// `#/components/schemas/Pet`.
    fn dereference(&self, reference: &str) -> crate::Result<JsonValue> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| Error::dereference(reference, "only local references are supported"))?;

        self.json
            .pointer(pointer)
            .cloned()
            .ok_or_else(|| Error::dereference(reference, "target not found in document"))
    }
}
