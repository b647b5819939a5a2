//! Field declaration types

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Declared type of a field value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    /// One-way link to records of another datasheet
    Link,
    /// Two-way link to records of another datasheet
    TwoWayLink,
    /// Unrecognized tag, value is passed through unchanged
    Other(String),
}

impl FieldType {
    /// The tag as the host spells it
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiSelect",
            FieldType::Date => "date",
            FieldType::Link => "link",
            FieldType::TwoWayLink => "twoWayLink",
            FieldType::Other(tag) => tag,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag {
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "checkbox" => FieldType::Checkbox,
            "select" => FieldType::Select,
            "multiSelect" => FieldType::MultiSelect,
            "date" => FieldType::Date,
            "link" => FieldType::Link,
            "twoWayLink" => FieldType::TwoWayLink,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from(tag.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field to set on a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name or field ID
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_name: String,
    #[serde(default)]
    pub field_type: FieldType,
    /// Raw user-entered value
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_value: String,
}

impl FieldSpec {
    pub fn new(
        field_name: impl Into<String>,
        field_type: impl Into<FieldType>,
        field_value: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            field_value: field_value.into(),
        }
    }
}

/// Parse the `fieldsUi` parameter.
///
/// Accepts the host's fixed-collection shape `{ "fieldValues": [...] }`, a
/// bare array of field objects, or nothing at all.
pub fn parse_fields_ui(value: Option<&JsonValue>) -> Result<Vec<FieldSpec>> {
    let list = match value {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Object(map)) => match map.get("fieldValues") {
            None | Some(JsonValue::Null) => return Ok(Vec::new()),
            Some(list) => list,
        },
        Some(list @ JsonValue::Array(_)) => list,
        Some(other) => {
            return Err(Error::invalid_param(
                "fieldsUi",
                format!("expected an object or array, got {other}"),
            ))
        }
    };

    Vec::<FieldSpec>::deserialize(list).map_err(|e| Error::invalid_param("fieldsUi", e.to_string()))
}

/// Host expressions may evaluate to numbers or booleans; fields take them as text.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    })
}
