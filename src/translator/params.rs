//! Parameter access
//!
//! The host resolves node parameters per input item (expressions can differ
//! from item to item). The translator only sees them through
//! [`ParameterSource`] and reads them with the typed accessors of
//! [`ItemParams`].

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use serde::Deserialize;

/// Host-provided parameter lookup
pub trait ParameterSource {
    /// Value of parameter `name` for the item at `item_index`, if set
    fn get_param(&self, name: &str, item_index: usize) -> Option<JsonValue>;
}

/// Node-level parameters with optional per-item overrides.
///
/// Deserializes from `{ "parameters": {...}, "items": [{...}, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JsonParameters {
    #[serde(default)]
    pub parameters: JsonObject,
    /// Item `i` overrides `parameters` for that item only
    #[serde(default)]
    pub items: Vec<JsonObject>,
}

impl JsonParameters {
    /// Parameters shared by every item
    pub fn new(parameters: JsonObject) -> Self {
        Self {
            parameters,
            items: Vec::new(),
        }
    }

    /// Add per-item overrides
    #[must_use]
    pub fn with_items(mut self, items: Vec<JsonObject>) -> Self {
        self.items = items;
        self
    }

    /// Number of input items; a batch without items still runs once
    pub fn item_count(&self) -> usize {
        self.items.len().max(1)
    }
}

impl ParameterSource for JsonParameters {
    fn get_param(&self, name: &str, item_index: usize) -> Option<JsonValue> {
        self.items
            .get(item_index)
            .and_then(|item| item.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }
}

/// Typed view of one item's parameters
pub struct ItemParams<'a, P: ParameterSource + ?Sized> {
    source: &'a P,
    item_index: usize,
}

impl<'a, P: ParameterSource + ?Sized> ItemParams<'a, P> {
    pub fn new(source: &'a P, item_index: usize) -> Self {
        Self { source, item_index }
    }

    /// Raw parameter value
    pub fn raw(&self, name: &str) -> Option<JsonValue> {
        self.source.get_param(name, self.item_index)
    }

    /// String parameter; unset or null reads as empty
    pub fn string(&self, name: &str) -> Result<String> {
        match self.raw(name) {
            None | Some(JsonValue::Null) => Ok(String::new()),
            Some(JsonValue::String(s)) => Ok(s),
            Some(v @ (JsonValue::Number(_) | JsonValue::Bool(_))) => Ok(v.to_string()),
            Some(other) => Err(Error::invalid_param(
                name,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Non-empty string parameter, `None` when empty
    pub fn optional(&self, name: &str) -> Result<Option<String>> {
        Ok(self.string(name)?.none_if_empty())
    }

    /// Mandatory identifier used as a path segment
    pub fn identifier(&self, name: &str, label: &str) -> Result<String> {
        let value = self.string(name)?;
        let value = value.trim();

        if value.is_empty() {
            return Err(Error::missing(label));
        }
        if value.contains(['/', '?', '#']) {
            return Err(Error::invalid_param(
                name,
                format!("'{value}' is not a valid {label}"),
            ));
        }

        Ok(value.to_string())
    }

    /// Boolean parameter; accepts `"true"`/`"false"` strings
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.raw(name) {
            None | Some(JsonValue::Null) => Ok(default),
            Some(JsonValue::Bool(b)) => Ok(b),
            Some(JsonValue::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                "" => Ok(default),
                _ => Err(Error::invalid_param(
                    name,
                    format!("expected true or false, got '{s}'"),
                )),
            },
            Some(other) => Err(Error::invalid_param(
                name,
                format!("expected a boolean, got {other}"),
            )),
        }
    }

    /// Non-negative integer parameter; accepts numeric strings
    pub fn u64_or(&self, name: &str, default: u64) -> Result<u64> {
        let invalid = |shown: &dyn std::fmt::Display| {
            Error::invalid_param(
                name,
                format!("expected a non-negative integer, got {shown}"),
            )
        };

        match self.raw(name) {
            None | Some(JsonValue::Null) => Ok(default),
            Some(JsonValue::Number(n)) => n
                .as_u64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                        .map(|f| f as u64)
                })
                .ok_or_else(|| invalid(&n)),
            Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(default),
            Some(JsonValue::String(s)) => s.trim().parse().map_err(|_| invalid(&s)),
            Some(other) => Err(invalid(&other)),
        }
    }

    /// List parameter: a JSON array of scalars or a comma-separated string
    pub fn string_list(&self, name: &str) -> Result<Vec<String>> {
        match self.raw(name) {
            None | Some(JsonValue::Null) => Ok(Vec::new()),
            Some(JsonValue::String(s)) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()),
            Some(JsonValue::Array(values)) => values
                .into_iter()
                .map(|v| match v {
                    JsonValue::String(s) => Ok(s),
                    JsonValue::Number(n) => Ok(n.to_string()),
                    other => Err(Error::invalid_param(
                        name,
                        format!("unexpected list entry {other}"),
                    )),
                })
                .collect(),
            Some(other) => Err(Error::invalid_param(
                name,
                format!("expected a list, got {other}"),
            )),
        }
    }
}
