//! Client-side record search
//!
//! "Quick search" semantics: a record matches when any string value in its
//! `fields` contains the term, ignoring case. Non-string values (numbers,
//! arrays, attachments) never match.

use crate::types::{JsonObject, JsonValue};

/// Whether any string field of `record` contains `needle` (already lower-cased)
pub fn record_matches(record: &JsonObject, needle: &str) -> bool {
    record
        .get("fields")
        .and_then(JsonValue::as_object)
        .is_some_and(|fields| {
            fields
                .values()
                .filter_map(JsonValue::as_str)
                .any(|value| value.to_lowercase().contains(needle))
        })
}

/// Keep the records matching `term`, preserving order
pub fn filter_records(records: Vec<JsonObject>, term: &str) -> Vec<JsonObject> {
    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|record| record_matches(record, &needle))
        .collect()
}
