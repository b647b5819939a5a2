//! HTTP client module
//!
//! Provides the authenticated HTTP collaborator used by the translator.
//!
//! # Features
//!
//! - **Transport seam**: `ApiTransport` trait so hosts and tests can inject their own client
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff for opt-in retries
//! - **Authentication**: Bearer token via the auth module

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ApiResponse, ApiTransport};
