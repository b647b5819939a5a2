//! Aitable Fusion API surface
//!
//! Endpoint paths for each API version and the typed response envelopes
//! the translator decodes responses into.

mod endpoints;
mod envelope;

pub use endpoints::Endpoints;
pub use envelope::{FieldMeta, FieldsData, NodesData, RecordsData, RemoteEnvelope};
