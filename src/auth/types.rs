//! Auth configuration types

use serde::Deserialize;
use std::fmt;

/// Environment variable consulted when no token is configured explicitly
pub const TOKEN_ENV_VAR: &str = "AITABLE_API_TOKEN";

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}

/// Stored Aitable credentials
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    /// Personal API token from the Aitable account settings
    #[serde(default)]
    pub api_token: String,
}

impl Credentials {
    /// Create credentials from an API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// Read the token from `AITABLE_API_TOKEN`
    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
    }

    /// Whether a token is present
    pub fn is_empty(&self) -> bool {
        self.api_token.trim().is_empty()
    }

    /// Aitable authenticates every call with `Authorization: Bearer <token>`
    pub fn auth_config(&self) -> AuthConfig {
        if self.is_empty() {
            AuthConfig::None
        } else {
            AuthConfig::Bearer {
                token: self.api_token.trim().to_string(),
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &if self.is_empty() { "" } else { "***" })
            .finish()
    }
}
