//! Authentication module
//!
//! Supports: Bearer token (Aitable API tokens), no auth
//!
//! `Credentials` holds the stored Aitable API token and turns it into the
//! `AuthConfig` the `Authenticator` applies to every outgoing request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Credentials, TOKEN_ENV_VAR};
