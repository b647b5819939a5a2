//! Record field handling
//!
//! Turns the user-declared `(fieldName, fieldType, fieldValue)` triples of a
//! create/edit operation into the `fields` object of an Aitable record
//! payload:
//!
//! - **Coercion**: raw strings become typed JSON per declared field type
//! - **Key resolution**: field names map to stable field IDs when the
//!   datasheet schema was fetched

mod coerce;
mod types;

pub use coerce::{build_fields, coerce_value, Coerced, FieldKeyMap};
pub use types::{parse_fields_ui, FieldSpec, FieldType};
