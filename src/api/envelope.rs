//! Response envelopes
//!
//! Every Aitable response is wrapped as `{ success, code, message, data }`.
//! Decoding never fails: anything that is not `success: true` with a `data`
//! payload of the expected shape becomes [`RemoteEnvelope::Failure`] carrying
//! the raw body, which the translator turns into a diagnostic record.

use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A decoded response envelope
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEnvelope<T> {
    /// `success: true` with a well-formed `data` payload
    Success { data: T },
    /// Any other shape
    Failure {
        /// The `message` field, if the body had one
        message: Option<String>,
        /// The untouched response body
        raw: JsonValue,
    },
}

impl<T: DeserializeOwned> RemoteEnvelope<T> {
    /// Decode a response body defensively
    pub fn decode(raw: &JsonValue) -> Self {
        if raw.get("success") == Some(&JsonValue::Bool(true)) {
            if let Some(Ok(data)) = raw.get("data").map(T::deserialize) {
                return Self::Success { data };
            }
        }

        Self::Failure {
            message: raw
                .get("message")
                .and_then(JsonValue::as_str)
                .map(String::from),
            raw: raw.clone(),
        }
    }
}

impl<T> RemoteEnvelope<T> {
    /// Whether the envelope decoded successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// `data` of `GET /spaces/{spaceId}/nodes`
#[derive(Debug, Clone, Deserialize)]
pub struct NodesData {
    /// Raw node objects in API order
    pub nodes: Vec<JsonValue>,
}

/// `data` of the record endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsData {
    /// Raw record objects (`recordId`, `fields`, timestamps) in API order
    pub records: Vec<JsonObject>,
}

/// `data` of `GET /datasheets/{datasheetId}/fields`
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsData {
    pub fields: Vec<FieldMeta>,
}

/// A field descriptor from the datasheet schema
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldMeta {
    /// Stable field ID (`fld...`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Remote field type (`SingleText`, `Number`, ...)
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    /// Everything else the API returned (`property`, `editable`, ...)
    #[serde(flatten)]
    pub extra: JsonObject,
}
