//! Transport seam between the translator and the network

use super::client::RequestConfig;
use crate::error::Result;
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use std::sync::Arc;

/// A decoded HTTP response: status plus the JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed body; a JSON string when the body was not JSON
    pub data: JsonValue,
}

/// Authenticated HTTP capability the translator is built on.
///
/// Implementations attach credentials themselves and return non-2xx
/// responses as errors.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue `method path` with the given query/body
    async fn send(&self, method: Method, path: &str, request: RequestConfig) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: ApiTransport + ?Sized> ApiTransport for Arc<T> {
    async fn send(&self, method: Method, path: &str, request: RequestConfig) -> Result<ApiResponse> {
        (**self).send(method, path, request).await
    }
}
