//! Recursive schema interpreter that builds one value per parameter.
//!
//! [`ValueResolver::resolve`] tries, in order:
//!
//! 1. primitive types (enums, bounded numerics, the per-type defaults, strings,
//!    files and arrays),
//! 2. models: `$ref` and `allOf` are dereferenced into an object definition and
//!    every property is resolved recursively,
//! 3. the constant [`FALLBACK_VALUE`].
//!
//! Nodes reached through dereferencing are owned copies, so the document is
//! never modified while values are generated.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::filler::FormFiller;
use crate::value::FillValue;

/// Resolves `$ref` pointers against the document that declared them.
pub trait Dereference {
    /// Return the schema fragment `reference` points to.
    fn dereference(&self, reference: &str) -> Result<JsonValue>;
}

/// Returned when nothing else could be built for a node.
pub const FALLBACK_VALUE: i64 = 42;
/// Lower bound used when a bounded numeric only declares `maximum`.
pub const DEFAULT_MINIMUM: i64 = 0;
/// Upper bound used when a bounded numeric only declares `minimum`.
pub const DEFAULT_MAXIMUM: i64 = 56;
/// Seed of the generator built for every bounded draw.
pub const RANDOM_SEED: u64 = 1;
/// File name handed to the file heuristic.
pub const EXAMPLE_FILE_NAME: &str = "cat.png";
/// Field name used for nodes that do not carry one.
pub const UNKNOWN_NAME: &str = "unknown";

const BOUNDED_NUMERIC_TYPES: &[&str] = &["integer", "number", "float", "double", "int32", "int64"];

/// Value for each type (or format) that does not need the field name.
pub static DEFAULT_VALUES_BY_TYPE: Lazy<HashMap<&'static str, FillValue>> = Lazy::new(|| {
    let date = NaiveDate::from_ymd_opt(2017, 6, 30).expect("valid calendar date");
    let date_time = date.and_hms_opt(23, 59, 45).expect("valid time of day");

    HashMap::from([
        ("int64", FillValue::Json(json!(42))),
        ("int32", FillValue::Json(json!(42))),
        ("integer", FillValue::Json(json!(42))),
        ("float", FillValue::Json(json!(4.2))),
        ("double", FillValue::Json(json!(4.2))),
        ("number", FillValue::Json(json!(4.2))),
        ("date", FillValue::Date(date)),
        ("date-time", FillValue::DateTime(date_time)),
        ("boolean", FillValue::Json(json!(true))),
    ])
});

/// Builds values for schema nodes of one document.
///
/// The resolver keeps the stack of `$ref` pointers it is currently expanding;
/// entering a pointer that is already on the stack is a cycle and fails with
/// [`Error::ParameterResolution`].
pub struct ValueResolver<'a, D: ?Sized, F: ?Sized> {
    spec: &'a D,
    filler: &'a F,
    expanding: Vec<String>,
}

impl<'a, D, F> ValueResolver<'a, D, F>
where
    D: Dereference + ?Sized,
    F: FormFiller + ?Sized,
{
    pub fn new(spec: &'a D, filler: &'a F) -> Self {
        Self {
            spec,
            filler,
            expanding: Vec::new(),
        }
    }

    /// Build a value for `node`, a parameter object or a schema.
    pub fn resolve(&mut self, node: &JsonValue) -> Result<FillValue> {
        let node = schema_of(node);

        if let Some(value) = self.resolve_primitive(&node)? {
            return Ok(value);
        }

        if let Some(value) = self.resolve_model(&node)? {
            return Ok(value);
        }

        log::debug!("No value for {}, using {}", node, FALLBACK_VALUE);
        Ok(FillValue::Json(json!(FALLBACK_VALUE)))
    }

    /// Value for a primitive node, `None` when `node` is not a primitive.
    ///
    /// The type tag is the `format` when there is one. Formats this resolver
    /// does not know (`email`, `uuid`, `int16`, ...) fall back to the `type`.
    /// A lookup on the format alone would send `{"type": "string", "format":
    /// "email"}` and `{"type": "number"}` to the model path, which builds `{}`.
    pub fn resolve_primitive(&mut self, node: &JsonValue) -> Result<Option<FillValue>> {
        let Some(parameter_type) = parameter_type(node) else {
            return Ok(None);
        };

        if let Some(value) = self.value_for_type(parameter_type, node) {
            return Ok(Some(value));
        }

        if let Some(declared) = str_field(node, "type") {
            if declared != parameter_type {
                if let Some(value) = self.value_for_type(declared, node) {
                    return Ok(Some(value));
                }
            }
        }

        if str_field(node, "type") == Some("array") {
            return self.resolve_array(node).map(Some);
        }

        Ok(None)
    }

    fn value_for_type(&self, parameter_type: &str, node: &JsonValue) -> Option<FillValue> {
        if let Some(first) = node
            .get("enum")
            .and_then(JsonValue::as_array)
            .and_then(|options| options.first())
        {
            return Some(FillValue::Json(first.clone()));
        }

        if BOUNDED_NUMERIC_TYPES.contains(&parameter_type) {
            if let Some(number) = bounded_integer(node) {
                return Some(FillValue::Json(json!(number)));
            }
        }

        if let Some(value) = DEFAULT_VALUES_BY_TYPE.get(parameter_type) {
            return Some(value.clone());
        }

        let name = str_field(node, "name").unwrap_or(UNKNOWN_NAME);
        match parameter_type {
            "string" => Some(FillValue::Json(JsonValue::String(
                self.filler.fill_string(name),
            ))),
            "file" | "binary" => Some(FillValue::File(
                self.filler.fill_file(name, EXAMPLE_FILE_NAME),
            )),
            _ => None,
        }
    }

    /// A one element array built from `items`, or `[]` when `items` is missing.
    pub fn resolve_array(&mut self, node: &JsonValue) -> Result<FillValue> {
        let items = match node.get("items") {
            Some(items) if !items.is_null() => items,
            _ => {
                log::debug!("Array without items, using an empty array");
                return Ok(FillValue::Array(Vec::new()));
            }
        };

        if let Some(default) = items.get("default") {
            return Ok(FillValue::Array(vec![FillValue::Json(default.clone())]));
        }

        let value = self.resolve(items)?;
        Ok(FillValue::Array(vec![value]))
    }

    /// An object with one entry per property of the dereferenced definition.
    ///
    /// Definitions that are not objects, or have no properties, give `{}`.
    pub fn resolve_model(&mut self, node: &JsonValue) -> Result<Option<FillValue>> {
        let mark = self.expanding.len();
        let created = self
            .object_definition(node)
            .and_then(|definition| self.create_object(&definition));
        self.expanding.truncate(mark);

        created.map(Some)
    }

    /// Dereference `node` into the object definition to build.
    ///
    /// Handles `$ref`, `allOf` (merged) and the `schema` wrapper of parameter
    /// objects, in that order. Every pointer followed stays on the expansion
    /// stack until the caller truncates it.
    pub fn object_definition(&mut self, node: &JsonValue) -> Result<JsonValue> {
        let mut definition = match str_field(node, "$ref") {
            Some(reference) => self.expand_reference(reference)?,
            None => node.clone(),
        };

        let parts = definition
            .get("allOf")
            .and_then(JsonValue::as_array)
            .cloned();
        if let Some(parts) = parts {
            definition = self.merge_all_parts(&parts)?;
        }

        if let Some(schema) = definition.get("schema").cloned() {
            let reference = str_field(&schema, "$ref").map(str::to_string);
            definition = match reference {
                Some(reference) => self.expand_reference(&reference)?,
                None => schema,
            };
        }

        Ok(definition)
    }

    /// Merge the parts of an `allOf` into a single object definition.
    ///
    /// `required` names are concatenated as they come (duplicates included)
    /// and a property declared by several parts keeps the last declaration.
    fn merge_all_parts(&mut self, parts: &[JsonValue]) -> Result<JsonValue> {
        let mut required = Vec::new();
        let mut properties = Map::new();

        for part in parts {
            let mark = self.expanding.len();
            let definition = self.object_definition(part);
            self.expanding.truncate(mark);
            let definition = definition?;

            if let Some(names) = definition.get("required").and_then(JsonValue::as_array) {
                required.extend(names.iter().cloned());
            }

            if let Some(declared) = definition.get("properties").and_then(JsonValue::as_object) {
                for (name, property) in declared {
                    properties.insert(name.clone(), property.clone());
                }
            }
        }

        Ok(json!({
            "required": required,
            "properties": properties,
            "type": "object",
        }))
    }

    fn create_object(&mut self, definition: &JsonValue) -> Result<FillValue> {
        let mut created = BTreeMap::new();

        if str_field(definition, "type") != Some("object") {
            log::debug!("Definition is not an object, using an empty object");
            return Ok(FillValue::Object(created));
        }

        let Some(properties) = definition.get("properties").and_then(JsonValue::as_object) else {
            log::debug!("Object definition without properties, using an empty object");
            return Ok(FillValue::Object(created));
        };

        for (name, property) in properties {
            // The heuristics pick better values when they know the field name.
            let mut property = property.clone();
            if let Some(fields) = property.as_object_mut() {
                fields
                    .entry("name")
                    .or_insert_with(|| JsonValue::String(name.clone()));
            }

            let value = self.resolve(&property)?;
            created.insert(name.clone(), value);
        }

        Ok(FillValue::Object(created))
    }

    fn expand_reference(&mut self, reference: &str) -> Result<JsonValue> {
        if self.expanding.iter().any(|active| active == reference) {
            return Err(Error::parameter_resolution(format!(
                "cyclic reference '{}' while expanding {}",
                reference,
                self.expanding.join(" -> ")
            )));
        }

        log::trace!("Dereferencing {}", reference);
        let target = self.spec.dereference(reference)?;
        self.expanding.push(reference.to_string());
        Ok(target)
    }
}

/// The node to interpret: the `schema` of a parameter object, or `node` itself.
///
/// The parameter name is copied into the schema when it has none.
fn schema_of(node: &JsonValue) -> std::borrow::Cow<'_, JsonValue> {
    use std::borrow::Cow;

    let Some(schema) = node.get("schema") else {
        return Cow::Borrowed(node);
    };

    match (schema.as_object(), str_field(node, "name")) {
        (Some(fields), Some(name)) if !fields.contains_key("name") => {
            let mut fields = fields.clone();
            fields.insert("name".to_string(), JsonValue::String(name.to_string()));
            Cow::Owned(JsonValue::Object(fields))
        }
        _ => Cow::Borrowed(schema),
    }
}

/// The `format` of the node, or its `type` when there is no format.
fn parameter_type(node: &JsonValue) -> Option<&str> {
    str_field(node, "format").or_else(|| str_field(node, "type"))
}

fn str_field<'n>(node: &'n JsonValue, key: &str) -> Option<&'n str> {
    node.get(key).and_then(JsonValue::as_str)
}

/// A reproducible integer within the declared `minimum`/`maximum`.
///
/// `None` when neither bound is declared. A missing bound defaults to
/// [`DEFAULT_MINIMUM`]/[`DEFAULT_MAXIMUM`], moved onto the declared bound if
/// it would invert the range. Inverted declared bounds give `minimum`.
fn bounded_integer(node: &JsonValue) -> Option<i64> {
    let minimum = node.get("minimum").and_then(as_bound);
    let maximum = node.get("maximum").and_then(as_bound);

    let (low, high) = match (minimum, maximum) {
        (Some(low), Some(high)) => (low, high),
        (Some(low), None) => (low, DEFAULT_MAXIMUM.max(low)),
        (None, Some(high)) => (DEFAULT_MINIMUM.min(high), high),
        (None, None) => return None,
    };

    if low > high {
        log::debug!("Inverted bounds [{}, {}], using the minimum", low, high);
        return Some(low);
    }

    let mut rng = StdRng::seed_from_u64(RANDOM_SEED);
    Some(rng.gen_range(low..=high))
}

fn as_bound(value: &JsonValue) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|bound| bound as i64))
}
