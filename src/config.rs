//! Node configuration
//!
//! Everything the node needs besides per-item parameters: where the API
//! lives, which version to target, the API token and client tuning. Loaded
//! from YAML (or JSON, which YAML accepts) with every field defaulted.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::translator::{RunMode, Translator};
use crate::types::ApiVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Node configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// API host, without the `/fusion/...` prefix
    pub base_url: String,

    /// API version used in request paths
    pub api_version: ApiVersion,

    /// Personal API token
    pub api_token: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Transport retries (0 = fail on first error)
    pub max_retries: u32,

    /// Client-side rate limit
    pub rate_limit: RateLimiterConfig,

    /// Continue past failing items, reporting them as records
    pub continue_on_failure: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::default(),
            api_token: String::new(),
            timeout_secs: 30,
            max_retries: 0,
            rate_limit: RateLimiterConfig::default(),
            continue_on_failure: false,
        }
    }
}

impl std::fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("rate_limit", &self.rate_limit)
            .field("continue_on_failure", &self.continue_on_failure)
            .finish()
    }
}

impl NodeConfig {
    /// Fill an empty token from `AITABLE_API_TOKEN`
    #[must_use]
    pub fn with_env_token(mut self) -> Self {
        if self.credentials().is_empty() {
            if let Some(credentials) = Credentials::from_env() {
                debug!("Using API token from environment");
                self.api_token = credentials.api_token;
            }
        }
        self
    }

    /// Replace the token when `token` is set
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api_token = token;
        }
        self
    }

    /// Check the configuration before building a client
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_token.clone())
    }

    pub fn run_mode(&self) -> RunMode {
        RunMode {
            continue_on_failure: self.continue_on_failure,
        }
    }

    /// HTTP client settings derived from this configuration
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(self.base_url.trim_end_matches('/'))
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .rate_limit(self.rate_limit.clone())
            .build()
    }

    /// Validate and build an authenticated client.
    ///
    /// A missing token is an error: every Aitable endpoint requires one.
    pub fn build_client(&self) -> Result<HttpClient> {
        self.validate()?;

        let credentials = self.credentials();
        if credentials.is_empty() {
            return Err(Error::config(
                "API token is required (set api_token, --token or AITABLE_API_TOKEN)",
            ));
        }

        HttpClient::with_auth(self.http_config(), credentials.auth_config())
    }

    /// Build a translator over a fresh client
    pub fn build_translator(&self) -> Result<Translator<HttpClient>> {
        Ok(Translator::new(self.build_client()?)
            .with_api_version(self.api_version)
            .with_run_mode(self.run_mode()))
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a configuration file (YAML or JSON)
pub fn load_config(path: impl AsRef<Path>) -> Result<NodeConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Parse and validate a configuration document
pub fn load_config_from_str(content: &str) -> Result<NodeConfig> {
    // An empty file means all defaults
    if content.trim().is_empty() {
        return Ok(NodeConfig::default());
    }

    let config: NodeConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
