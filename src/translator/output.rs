//! Output records and diagnostics

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// One item handed back to the host, paired with the input item that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: JsonValue,
    pub paired_item: usize,
}

impl OutputRecord {
    pub fn new(json: JsonValue, paired_item: usize) -> Self {
        Self { json, paired_item }
    }

    /// Whether this record reports a failure rather than remote data
    pub fn is_diagnostic(&self) -> bool {
        self.json.get("error").is_some() || self.json.get("success") == Some(&JsonValue::Bool(false))
    }
}

/// Outcome of a batch run.
///
/// A strict-mode failure stops the batch; `output` still holds every record
/// produced for the items before it.
#[derive(Debug)]
pub struct Execution {
    pub output: Vec<OutputRecord>,
    pub error: Option<Error>,
}

impl Execution {
    /// Whether every item was processed
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Drop partial output on failure
    pub fn into_result(self) -> Result<Vec<OutputRecord>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}

/// `{ ...record, datasheetId }`
pub(crate) fn with_datasheet_id(mut record: JsonObject, datasheet_id: &str) -> JsonValue {
    record.insert(
        "datasheetId".to_string(),
        JsonValue::String(datasheet_id.to_string()),
    );
    JsonValue::Object(record)
}

/// Soft failure: the remote answered with an unexpected envelope
pub(crate) fn unexpected_response(message: &str, response: JsonValue) -> JsonValue {
    json!({
        "success": false,
        "message": message,
        "response": response,
    })
}

/// Diagnostic record for an item that failed in tolerant mode
pub(crate) fn failure_record(operation: &str, err: &Error) -> JsonValue {
    if let Error::Remote {
        action,
        datasheet_id,
        record_id,
        source,
    } = err
    {
        let mut record = json!({
            "success": false,
            "message": format!("Error {action}: {source}"),
            "datasheetId": datasheet_id,
        });
        if let Some(record_id) = record_id {
            record["recordId"] = JsonValue::String(record_id.clone());
        }
        return record;
    }

    let mut record = json!({
        "error": err.to_string(),
        "operation": operation,
        "statusCode": err
            .status_code()
            .map_or_else(|| JsonValue::String("unknown".to_string()), JsonValue::from),
    });
    if let Some(details) = err.error_details() {
        record["errorDetails"] = details;
    }
    record
}
