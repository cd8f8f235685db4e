//! HTTP client module
//!
//! Provides the HTTP client every Box call goes through.
//!
//! # Features
//!
//! - **Bearer Auth**: Tokens come from the [`Authenticator`](crate::auth::Authenticator)
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Retries**: Opt-in retry with constant, linear or exponential backoff

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
