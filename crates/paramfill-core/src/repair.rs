//! Fixes for common mistakes found in hand-written or generated documents.
//!
//! Some documents declare parameters that downstream type dispatch chokes on:
//!
//! ```json
//! {"name": "sort", "in": "query", "type": "string", "format": "string"}
//! {"name": "fields[Users]", "in": "query", "type": "string", "format": "int64", "default": ""}
//! ```
//!
//! The passes below rewrite those parameters in place before any value is
//! generated. None of them can fail.

use std::collections::HashMap;

use serde_json::{Map, Value as JsonValue};

use crate::operation::Parameter;

/// Formats that are not allowed on a `string` typed parameter.
const INVALID_STRING_FORMATS: &[&str] = &["int32", "int64", "float", "double", ""];

/// Numeric formats whose `default` must be numeric.
const NUMERIC_FORMATS: &[&str] = &["double", "float", "int32", "int64"];

/// Run every repair pass over the parameters of an operation.
///
/// The parameter object and its inline `schema` (where OpenAPI 3 keeps type
/// and format) are both repaired.
pub fn fix_common_spec_issues(params: &mut HashMap<String, Parameter>) {
    for param in params.values_mut() {
        let Some(spec) = param.param_spec.as_object_mut() else {
            continue;
        };
        if let Some(JsonValue::Object(schema)) = spec.get_mut("schema") {
            fix_node(&param.name, schema);
        }
        fix_node(&param.name, spec);
    }
}

fn fix_node(name: &str, node: &mut Map<String, JsonValue>) {
    fix_string_format(name, node);
    fix_string_with_invalid_format(name, node);
    fix_bad_default_for_number_type(name, node);
}

fn str_field<'a>(node: &'a Map<String, JsonValue>, key: &str) -> Option<&'a str> {
    node.get(key).and_then(JsonValue::as_str)
}

/// `"format": "string"` on a string carries no meaning.
fn fix_string_format(name: &str, node: &mut Map<String, JsonValue>) {
    if str_field(node, "type") == Some("string") && str_field(node, "format") == Some("string") {
        log::debug!("Removing redundant 'string' format from parameter '{}'", name);
        node.remove("format");
    }
}

/// Numeric (or empty) formats are invalid for string types; fall back to a plain string.
fn fix_string_with_invalid_format(name: &str, node: &mut Map<String, JsonValue>) {
    if str_field(node, "type") != Some("string") {
        return;
    }
    if let Some(format) = str_field(node, "format") {
        if INVALID_STRING_FORMATS.contains(&format) {
            log::debug!(
                "Removing invalid format '{}' from string parameter '{}'",
                format,
                name
            );
            node.remove("format");
        }
    }
}

/// A textual default for a numeric format must be made only of decimal digits,
/// anything else (including "-5" and "3.14") is replaced by `0`.
fn fix_bad_default_for_number_type(name: &str, node: &mut Map<String, JsonValue>) {
    let Some(format) = str_field(node, "format") else {
        return;
    };
    if !NUMERIC_FORMATS.contains(&format) {
        return;
    }
    let Some(default) = str_field(node, "default") else {
        return;
    };
    if is_digits(default) {
        return;
    }

    log::debug!(
        "Replacing non numeric default {:?} of parameter '{}' with 0",
        default,
        name
    );
    node.insert("default".to_string(), JsonValue::from(0));
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
