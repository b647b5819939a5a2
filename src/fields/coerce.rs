//! Value coercion and field key resolution

use super::types::{FieldSpec, FieldType};
use crate::api::FieldMeta;
use crate::types::{JsonObject, JsonValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Result of coercing one raw value
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// Put this value in the payload (may be an explicit `null`)
    Value(JsonValue),
    /// Leave the field out of the payload entirely
    Omit,
}

/// Coerce a user-entered string to the JSON value the API expects for `field_type`
pub fn coerce_value(field_type: &FieldType, raw: &str) -> Coerced {
    let value = match field_type {
        FieldType::Text | FieldType::Select | FieldType::Other(_) => {
            JsonValue::String(raw.to_string())
        }
        FieldType::Number => {
            if raw.is_empty() {
                JsonValue::Null
            } else {
                parse_number(raw)
            }
        }
        FieldType::Checkbox => JsonValue::Bool(raw.to_lowercase() == "true"),
        FieldType::MultiSelect => JsonValue::Array(split_list(raw)),
        FieldType::Date => {
            if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
                parse_number(raw)
            } else {
                JsonValue::String(raw.to_string())
            }
        }
        FieldType::Link | FieldType::TwoWayLink => {
            if raw.eq_ignore_ascii_case("null") {
                JsonValue::Null
            } else if raw.is_empty() {
                // A blank automation input must never clear existing links
                return Coerced::Omit;
            } else {
                JsonValue::Array(split_list(raw))
            }
        }
    };

    Coerced::Value(value)
}

/// Split on commas, trim, drop empty tokens
fn split_list(raw: &str) -> Vec<JsonValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| JsonValue::String(token.to_string()))
        .collect()
}

/// Integers stay integers; anything unparseable or non-finite becomes `null`.
///
/// Follows the host's numeric conversion: blank input is `0` and
/// `0x`/`0o`/`0b` prefixes select the radix.
fn parse_number(raw: &str) -> JsonValue {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return JsonValue::from(0);
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return JsonValue::from(n);
    }

    if let Some(n) = parse_radix_literal(trimmed) {
        return JsonValue::from(n);
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                JsonValue::from(n as i64)
            } else {
                serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
            }
        }
        _ => {
            warn!("Value '{}' is not a number, sending null", raw);
            JsonValue::Null
        }
    }
}

/// `0x1A`, `0o17`, `0b101` (unsigned, no sign allowed)
fn parse_radix_literal(value: &str) -> Option<u64> {
    let (radix, digits) = match value.get(..2)? {
        "0x" | "0X" => (16, &value[2..]),
        "0o" | "0O" => (8, &value[2..]),
        "0b" | "0B" => (2, &value[2..]),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Lower-cased field name → field ID, built from fetched datasheet metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldKeyMap {
    ids_by_name: HashMap<String, String>,
}

impl FieldKeyMap {
    /// Build the map from the datasheet schema
    pub fn from_fields(fields: &[FieldMeta]) -> Self {
        let ids_by_name = fields
            .iter()
            .map(|field| (field.name.to_lowercase(), field.id.clone()))
            .collect();
        Self { ids_by_name }
    }

    pub fn len(&self) -> usize {
        self.ids_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_name.is_empty()
    }

    /// The payload key for `name`: its field ID on a hit, `name` verbatim otherwise
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.ids_by_name
            .get(&name.to_lowercase())
            .map_or(name, String::as_str)
    }
}

/// Build the `fields` object of a record payload.
///
/// Entries with an empty name are skipped. Keys go through `keys` when the
/// schema was fetched; a later entry for the same key overwrites an earlier one.
pub fn build_fields(specs: &[FieldSpec], keys: Option<&FieldKeyMap>) -> JsonObject {
    let mut fields = JsonObject::new();

    for spec in specs {
        if spec.field_name.is_empty() {
            continue;
        }

        let key = keys.map_or(spec.field_name.as_str(), |k| k.resolve(&spec.field_name));

        match coerce_value(&spec.field_type, &spec.field_value) {
            Coerced::Value(value) => {
                fields.insert(key.to_string(), value);
            }
            Coerced::Omit => {
                debug!("Skipping empty {} field '{}'", spec.field_type, spec.field_name);
            }
        }
    }

    fields
}
