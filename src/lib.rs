//! # Aitable Node
//!
//! A workflow node for [Aitable.ai](https://aitable.ai): search spaces and
//! datasheets, and create, edit or delete records, one input item at a time.
//!
//! ## Features
//!
//! - **Node search**: find datasheets, folders, forms, dashboards and mirrors in a space
//! - **Record search**: server-side formula filters plus a client-side "contains" search
//! - **Record writes**: typed field coercion and optional name-to-ID field resolution
//! - **Batch semantics**: strict or continue-on-failure, every output paired with its input item
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aitable_node::{load_config, JsonParameters, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let translator = load_config("aitable.yaml")?.build_translator()?;
//!
//!     let params: JsonParameters = serde_json::from_value(json!({
//!         "parameters": {
//!             "operation": "searchNodesInDatasheet",
//!             "datasheetId": "dstXXXXXXXX",
//!             "searchTerm": "alpha"
//!         }
//!     }))?;
//!
//!     for record in translator.execute(params.item_count(), &params).await.into_result()? {
//!         println!("{} -> {}", record.paired_item, record.json);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Translator                              │
//! │  ParameterSource → Operation → request → envelope → records     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │      API      │  Fields   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Bearer   │ Transport │ Endpoints     │ Coercion  │ pairedItem  │
//! │ Env token│ Rate Limit│ Envelopes     │ Key map   │ Diagnostics │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// API token authentication
pub mod auth;

/// HTTP client, transport seam and rate limiting
pub mod http;

/// Endpoint paths and response envelopes
pub mod api;

/// Field specs and value coercion
pub mod fields;

/// Operation dispatch and batch execution
pub mod translator;

/// Node configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{load_config, load_config_from_str, NodeConfig};
pub use http::{ApiTransport, HttpClient};
pub use translator::{
    Execution, JsonParameters, Operation, OperationKind, OutputRecord, ParameterSource, RunMode,
    Translator,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
