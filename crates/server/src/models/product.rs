//! Product model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storepulse_core::{ProductId, TenantId};

/// A synced product, unique per `(tenant, external product id)`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub shopify_product_id: String,
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub handle: Option<String>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized product state applied by an upsert.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub shopify_product_id: String,
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub handle: Option<String>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
}
