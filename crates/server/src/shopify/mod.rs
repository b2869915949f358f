//! Shopify Admin REST API client and webhook verification.
//!
//! # Architecture
//!
//! - [`client`] - cursor-paginated REST fetches; a scoped, stateless client
//!   is built per call from one tenant's `(shop_domain, access_token)` - no
//!   process-wide singleton
//! - [`pagination`] - `link` response-header parsing for the `rel="next"`
//!   page cursor
//! - [`types`] - external wire representations with lenient field parsing
//! - [`webhook`] - HMAC-SHA256 signature verification over raw body bytes

pub mod client;
pub mod pagination;
pub mod types;
pub mod webhook;

pub use client::{
    AdminConnector, AdminRestClient, Page, PageCursor, PlatformApi, PlatformConnector, Resource,
};

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed (network error or timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ShopifyError::Api {
            status: 429,
            message: "throttled".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 429 - throttled");
    }
}
