//! REST operations and their parameters.
//!
//! An [`Operation`] owns its parameters by name. Each [`Parameter`] keeps the
//! raw parameter object from the document (`param_spec`) and a `fill` slot
//! written by [`crate::handler::ParameterHandler`].

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::value::FillValue;

/// A named REST action, e.g. `addStoreItem`.
#[derive(Debug, Clone)]
pub struct Operation {
    /// The `operationId`, or a name derived from method and path
    pub id: String,
    /// Lower-case HTTP method
    pub method: String,
    /// Path template as declared in the document (e.g. "/pet/{petId}")
    pub path: String,
    /// Parameters keyed by name
    pub params: HashMap<String, Parameter>,
}

impl Operation {
    pub fn new(id: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            path: path.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter, replacing any previous one with the same name.
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.insert(param.name.clone(), param);
        self
    }

    /// Parameter names in a stable (sorted) order.
    pub fn param_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.params.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// One input of an operation.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Name of the parameter as declared in the document
    pub name: String,
    /// Location of the parameter: "query", "header", "path", "cookie", "formData" or "body"
    pub location: String,
    /// Whether the parameter is mandatory
    pub required: bool,
    /// The raw parameter object, including `schema` when present
    pub param_spec: JsonValue,
    /// The value chosen for this parameter, unset until resolution
    pub fill: Option<FillValue>,
}

impl Parameter {
    /// Build a parameter from its raw object in the document.
    ///
    /// Returns `None` when the object has no `name`.
    pub fn from_spec(param_spec: JsonValue) -> Option<Self> {
        let name = param_spec.get("name")?.as_str()?.to_string();
        let location = param_spec
            .get("in")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();
        let required = param_spec
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);

        Some(Self {
            name,
            location,
            required,
            param_spec,
            fill: None,
        })
    }

    /// The static default declared for this parameter.
    ///
    /// Read from the parameter object first and from its inline `schema`
    /// second, so repairs applied to `param_spec` are visible here. A JSON
    /// `null` is treated as no default.
    pub fn default_value(&self) -> Option<&JsonValue> {
        self.param_spec
            .get("default")
            .or_else(|| self.param_spec.get("schema")?.get("default"))
            .filter(|value| !value.is_null())
    }
}
