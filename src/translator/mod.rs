//! Request translator module
//!
//! Maps the host's per-item execution contract onto Aitable API calls.
//!
//! # Overview
//!
//! - `ParameterSource` / `JsonParameters` - Per-item parameter lookup
//! - `Operation` - Tagged operation with typed, validated parameters
//! - `Translator` - Sequential batch execution over an `ApiTransport`
//! - `OutputRecord` - `{ json, pairedItem }` results handed back to the host
//!
//! Items are processed strictly in order, one remote round-trip at a time.
//! Nothing is shared between items; field metadata is refetched per item.

mod executor;
mod operation;
mod output;
mod params;
mod search;

pub use executor::{RunMode, Translator};
pub use operation::{
    DeleteRecordParams, NodeType, Operation, OperationKind, PermissionLevel, SearchNodesParams,
    SearchRecordsParams, WriteRecordParams, DEFAULT_MAX_RESULTS,
};
pub use output::{Execution, OutputRecord};
pub use params::{ItemParams, JsonParameters, ParameterSource};
pub use search::{filter_records, record_matches};

#[cfg(test)]
mod tests;
