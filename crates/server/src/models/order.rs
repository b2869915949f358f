//! Order and order item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use storepulse_core::{CustomerId, OrderId, OrderItemId, ProductId, TenantId};

/// A synced order, unique per `(tenant, external order id)`.
///
/// The customer reference is nullable; anonymous/guest orders are allowed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub tenant_id: TenantId,
    pub shopify_order_id: String,
    pub customer_id: Option<CustomerId>,
    pub order_number: Option<i64>,
    pub email: Option<String>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub total_price: Decimal,
    pub subtotal_price: Decimal,
    pub total_tax: Decimal,
    pub currency: Option<String>,
    pub billing_address: Option<serde_json::Value>,
    pub shipping_address: Option<serde_json::Value>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item owned by exactly one order.
///
/// Items are destructively replaced on every order reconciliation, so item
/// identity is not preserved across syncs. The product reference is nullable:
/// the product may be deleted upstream or not yet synced locally.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub shopify_product_id: Option<String>,
    pub shopify_variant_id: Option<String>,
    pub title: Option<String>,
    pub quantity: i64,
    pub price: Decimal,
}

/// Normalized order header state applied by an upsert.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub shopify_order_id: String,
    pub customer_id: Option<CustomerId>,
    pub order_number: Option<i64>,
    pub email: Option<String>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub total_price: Decimal,
    pub subtotal_price: Decimal,
    pub total_tax: Decimal,
    pub currency: Option<String>,
    pub billing_address: Option<serde_json::Value>,
    pub shipping_address: Option<serde_json::Value>,
    pub shopify_created_at: Option<DateTime<Utc>>,
    pub shopify_updated_at: Option<DateTime<Utc>>,
}

/// One incoming line item, resolved against the local product table.
#[derive(Debug, Clone, Default)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub shopify_product_id: Option<String>,
    pub shopify_variant_id: Option<String>,
    pub title: Option<String>,
    pub quantity: i64,
    pub price: Decimal,
}
