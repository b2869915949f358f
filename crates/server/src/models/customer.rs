//! Customer model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use storepulse_core::{CustomerId, TenantId};

/// A synced customer, unique per `(tenant, external customer id)`.
///
/// Aggregate fields (`orders_count`, `total_spent`) are overwritten wholesale
/// on each sync or webhook; last write wins, no merge.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub tenant_id: TenantId,
    pub shopify_customer_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub orders_count: i64,
    pub total_spent: Decimal,
    pub state: Option<String>,
    pub tags: Vec<String>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized customer state applied by an upsert.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub shopify_customer_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub orders_count: i64,
    pub total_spent: Decimal,
    pub state: Option<String>,
    /// Canonical tag list; vendor string encoding never reaches this struct.
    pub tags: Vec<String>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
}
