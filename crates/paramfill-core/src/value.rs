//! Concrete values produced for operation parameters.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value as JsonValue};

/// A file payload for `file` typed parameters (multipart uploads).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    /// Name sent with the upload
    pub file_name: String,
    /// MIME type guessed from the file name extension
    pub content_type: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl NamedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// The value assigned to a parameter's fill slot.
///
/// Scalars coming straight from the document (enum members, literal defaults)
/// and the generated numbers, booleans and strings are kept as JSON. Dates and
/// files keep their own types so that the request builder can encode them for
/// the parameter location.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Json(JsonValue),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    File(NamedFile),
    Array(Vec<FillValue>),
    Object(BTreeMap<String, FillValue>),
}

impl FillValue {
    /// Render the value as plain JSON.
    ///
    /// Dates use ISO-8601 and files are summarised by name, type and size.
    pub fn to_json(&self) -> JsonValue {
        match self {
            FillValue::Json(value) => value.clone(),
            FillValue::Date(date) => JsonValue::String(date.format("%Y-%m-%d").to_string()),
            FillValue::DateTime(date_time) => {
                JsonValue::String(date_time.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            FillValue::File(file) => json!({
                "file_name": file.file_name,
                "content_type": file.content_type,
                "size": file.content.len(),
            }),
            FillValue::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            FillValue::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            FillValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<JsonValue> for FillValue {
    fn from(value: JsonValue) -> Self {
        FillValue::Json(value)
    }
}

impl From<NamedFile> for FillValue {
    fn from(file: NamedFile) -> Self {
        FillValue::File(file)
    }
}
