//! Cursor-paginated Shopify Admin REST client.
//!
//! A fresh, tenant-scoped [`AdminRestClient`] is built per sync run from one
//! tenant's credentials; nothing is shared across tenants. The [`PlatformApi`]
//! and [`PlatformConnector`] traits are the seams the sync engine is generic
//! over, so tests can substitute scripted fakes for the live API.

use std::time::Duration;

use secrecy::ExposeSecret;

use crate::models::Tenant;
use crate::shopify::ShopifyError;
use crate::shopify::pagination::next_page_info;

/// The syncable resource collections, in canonical sync order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Customers,
    Orders,
}

impl Resource {
    /// URL path segment for the collection endpoint.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Orders => "orders",
        }
    }

    /// JSON envelope key the API wraps the record array in.
    #[must_use]
    pub const fn envelope(self) -> &'static str {
        // Same as the path for all current resources.
        self.path()
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Opaque pagination token lifted from the `link` response header.
///
/// Only ever passed back verbatim as the `page_info` query parameter; its
/// contents are never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(pub String);

/// One page of raw records plus the cursor to the next page, if any.
#[derive(Debug)]
pub struct Page {
    pub records: Vec<serde_json::Value>,
    pub next: Option<PageCursor>,
}

/// One tenant's view of the platform API.
#[allow(async_fn_in_trait)]
pub trait PlatformApi {
    /// Fetch one page of a resource collection.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] on transport failure, a non-success status,
    /// or an unparseable response body.
    async fn fetch_page(
        &self,
        resource: Resource,
        cursor: Option<&PageCursor>,
    ) -> Result<Page, ShopifyError>;
}

/// Builds a tenant-scoped API handle from stored credentials.
pub trait PlatformConnector {
    type Api: PlatformApi + Send + Sync;

    /// Construct an API handle for one tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] if the underlying HTTP client cannot be built.
    fn connect(&self, tenant: &Tenant) -> Result<Self::Api, ShopifyError>;
}

/// Live Admin REST API client, scoped to a single tenant.
pub struct AdminRestClient {
    http: reqwest::Client,
    shop_domain: String,
    access_token: secrecy::SecretString,
    api_version: String,
    page_limit: u32,
}

impl AdminRestClient {
    /// Build a client for one tenant's store.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the HTTP client cannot be built.
    pub fn new(
        tenant: &Tenant,
        api_version: &str,
        page_limit: u32,
        timeout: Duration,
    ) -> Result<Self, ShopifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            shop_domain: tenant.shop_domain.clone(),
            access_token: tenant.access_token.clone(),
            api_version: api_version.to_owned(),
            page_limit,
        })
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!(
            "https://{}/admin/api/{}/{}.json",
            self.shop_domain,
            self.api_version,
            resource.path()
        )
    }
}

impl PlatformApi for AdminRestClient {
    async fn fetch_page(
        &self,
        resource: Resource,
        cursor: Option<&PageCursor>,
    ) -> Result<Page, ShopifyError> {
        let mut request = self
            .http
            .get(self.collection_url(resource))
            .header("X-Shopify-Access-Token", self.access_token.expose_secret())
            .query(&[("limit", self.page_limit.to_string())]);

        match cursor {
            Some(PageCursor(token)) => {
                // A cursored request may only carry limit and page_info;
                // filters belong to the first request of the walk.
                request = request.query(&[("page_info", token.as_str())]);
            }
            None => {
                if resource == Resource::Orders {
                    request = request.query(&[("status", "any")]);
                }
            }
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let next_token = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_info);

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ShopifyError::Parse(e.to_string()))?;

        let records = match body.get(resource.envelope()) {
            Some(serde_json::Value::Array(items)) => items.clone(),
            Some(other) => {
                return Err(ShopifyError::Parse(format!(
                    "expected array under {:?}, got {other}",
                    resource.envelope()
                )));
            }
            None => Vec::new(),
        };

        let next = next_cursor(records.len(), self.page_limit, next_token);

        Ok(Page { records, next })
    }
}

/// Decide whether another page follows.
///
/// The walk ends when there is no `rel="next"` token, or when the page came
/// back short of the requested limit — the API can emit a link header on the
/// final page, so the token alone is not trusted.
fn next_cursor(records_len: usize, page_limit: u32, token: Option<String>) -> Option<PageCursor> {
    if records_len < page_limit as usize {
        None
    } else {
        token.map(PageCursor)
    }
}

/// Connector producing live [`AdminRestClient`] handles.
#[derive(Debug, Clone)]
pub struct AdminConnector {
    pub api_version: String,
    pub page_limit: u32,
    pub timeout: Duration,
}

impl PlatformConnector for AdminConnector {
    type Api = AdminRestClient;

    fn connect(&self, tenant: &Tenant) -> Result<Self::Api, ShopifyError> {
        AdminRestClient::new(tenant, &self.api_version, self.page_limit, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Products.path(), "products");
        assert_eq!(Resource::Customers.path(), "customers");
        assert_eq!(Resource::Orders.path(), "orders");
    }

    #[test]
    fn test_resource_display_matches_path() {
        assert_eq!(Resource::Orders.to_string(), "orders");
    }

    #[test]
    fn test_full_page_with_token_continues() {
        let next = next_cursor(250, 250, Some("abc123".to_owned()));
        assert_eq!(next, Some(PageCursor("abc123".to_owned())));
    }

    #[test]
    fn test_missing_token_ends_walk() {
        assert_eq!(next_cursor(250, 250, None), None);
    }

    #[test]
    fn test_short_page_ends_walk_despite_token() {
        assert_eq!(next_cursor(120, 250, Some("abc123".to_owned())), None);
    }

    #[test]
    fn test_empty_page_ends_walk() {
        assert_eq!(next_cursor(0, 250, Some("abc123".to_owned())), None);
    }
}
