//! Custom event model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storepulse_core::{EventId, TenantId};

/// Event type recorded for abandoned-cart webhooks.
pub const CART_ABANDONED: &str = "cart_abandoned";

/// An append-only side-channel signal (e.g., abandoned cart).
///
/// Never updated or deleted; the raw payload is kept verbatim.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomEvent {
    pub id: EventId,
    pub tenant_id: TenantId,
    pub event_type: String,
    pub shopify_customer_id: Option<String>,
    pub email: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Data for appending a custom event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_type: String,
    pub shopify_customer_id: Option<String>,
    pub email: Option<String>,
    pub payload: serde_json::Value,
}
