//! Per-record reconciliation of wire payloads into local state.
//!
//! A [`Reconciler`] is scoped to one tenant and applies one record at a time,
//! whether the record arrived in a sync page or a webhook body. Records are
//! parsed individually so a single malformed payload skips that record
//! instead of aborting the batch it arrived in.

use serde::de::DeserializeOwned;
use thiserror::Error;

use storepulse_core::{CustomerId, EventId, OrderId, TenantId};

use crate::db::RepositoryError;
use crate::models::{CART_ABANDONED, NewCustomer, NewEvent, NewOrder, NewOrderItem, NewProduct};
use crate::shopify::types::{ShopifyCustomer, ShopifyOrder, ShopifyProduct};

use super::EntityStore;

/// Errors from reconciling one record.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The record is structurally unusable (e.g., missing its external id).
    /// Skippable: the batch continues without it.
    #[error("invalid {resource} record: {reason}")]
    Validation {
        resource: &'static str,
        reason: String,
    },

    /// Persistence failed. Fatal for the resource being synced.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

fn parse_record<T: DeserializeOwned>(
    resource: &'static str,
    record: &serde_json::Value,
) -> Result<T, ReconcileError> {
    serde_json::from_value(record.clone()).map_err(|e| ReconcileError::Validation {
        resource,
        reason: e.to_string(),
    })
}

/// Applies wire records to one tenant's local state.
pub struct Reconciler<'a, S> {
    store: &'a S,
    tenant_id: TenantId,
}

impl<'a, S: EntityStore> Reconciler<'a, S> {
    /// Create a reconciler scoped to one tenant.
    #[must_use]
    pub const fn new(store: &'a S, tenant_id: TenantId) -> Self {
        Self { store, tenant_id }
    }

    /// Reconcile one customer record.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] for an unparseable record or
    /// [`ReconcileError::Store`] if the write fails.
    pub async fn upsert_customer(
        &self,
        record: &serde_json::Value,
    ) -> Result<CustomerId, ReconcileError> {
        let wire: ShopifyCustomer = parse_record("customer", record)?;
        let id = self
            .store
            .upsert_customer(self.tenant_id, &customer_record(&wire))
            .await?;
        Ok(id)
    }

    /// Reconcile one product record.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] for an unparseable record or
    /// [`ReconcileError::Store`] if the write fails.
    pub async fn upsert_product(
        &self,
        record: &serde_json::Value,
    ) -> Result<storepulse_core::ProductId, ReconcileError> {
        let wire: ShopifyProduct = parse_record("product", record)?;
        let id = self
            .store
            .upsert_product(self.tenant_id, &product_record(&wire))
            .await?;
        Ok(id)
    }

    /// Reconcile one order record: resolve the customer, upsert the header,
    /// and destructively replace the item set.
    ///
    /// An embedded customer object links by external id; an already-known
    /// customer row is reused untouched, since the embedded record is sparse
    /// and would zero synced aggregates. Only a missing customer is created
    /// from it. With no embedded customer, the order email is used as a
    /// fallback lookup. Orders matching neither stay unlinked.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`] for an unparseable record or
    /// [`ReconcileError::Store`] if any write fails.
    pub async fn upsert_order(
        &self,
        record: &serde_json::Value,
    ) -> Result<OrderId, ReconcileError> {
        let wire: ShopifyOrder = parse_record("order", record)?;

        let customer_id = match &wire.customer {
            Some(embedded) => {
                let existing = self
                    .store
                    .find_customer_by_external_id(self.tenant_id, &embedded.id.to_string())
                    .await?;
                match existing {
                    Some(customer) => Some(customer.id),
                    None => Some(
                        self.store
                            .upsert_customer(self.tenant_id, &customer_record(embedded))
                            .await?,
                    ),
                }
            }
            None => match wire.email.as_deref() {
                Some(email) => self
                    .store
                    .find_customer_by_email(self.tenant_id, email)
                    .await?
                    .map(|c| c.id),
                None => None,
            },
        };

        let header = NewOrder {
            shopify_order_id: wire.id.to_string(),
            customer_id,
            order_number: wire.order_number,
            email: wire.email.clone(),
            financial_status: wire.financial_status.clone(),
            fulfillment_status: wire.fulfillment_status.clone(),
            total_price: wire.total_price.unwrap_or_default(),
            subtotal_price: wire.subtotal_price.unwrap_or_default(),
            total_tax: wire.total_tax.unwrap_or_default(),
            currency: wire.currency.clone(),
            billing_address: wire.billing_address.clone(),
            shipping_address: wire.shipping_address.clone(),
            shopify_created_at: wire.created_at,
            shopify_updated_at: wire.updated_at,
        };
        let order_id = self.store.upsert_order(self.tenant_id, &header).await?;

        let mut items = Vec::with_capacity(wire.line_items.len());
        for line in &wire.line_items {
            let product_id = match line.product_id {
                Some(external) => self
                    .store
                    .find_product_by_external_id(self.tenant_id, &external.to_string())
                    .await?
                    .map(|p| p.id),
                None => None,
            };
            items.push(NewOrderItem {
                product_id,
                shopify_product_id: line.product_id.map(|id| id.to_string()),
                shopify_variant_id: line.variant_id.map(|id| id.to_string()),
                title: line.title.clone(),
                quantity: line.quantity.unwrap_or(1),
                price: line.price.unwrap_or_default(),
            });
        }
        // Items are replaced even when empty so stale rows never survive.
        self.store
            .replace_order_items(self.tenant_id, order_id, &items)
            .await?;

        Ok(order_id)
    }

    /// Record an abandoned-cart payload in the append-only event log.
    ///
    /// The customer reference and email are lifted out for querying; the
    /// payload itself is stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Store`] if the append fails.
    pub async fn append_cart_event(
        &self,
        payload: &serde_json::Value,
    ) -> Result<EventId, ReconcileError> {
        let customer = payload.get("customer");
        let shopify_customer_id = customer
            .and_then(|c| c.get("id"))
            .map(json_id_to_string);
        let email = payload
            .get("email")
            .or_else(|| customer.and_then(|c| c.get("email")))
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);

        let event = NewEvent {
            event_type: CART_ABANDONED.to_owned(),
            shopify_customer_id,
            email,
            payload: payload.clone(),
        };
        let id = self.store.append_event(self.tenant_id, &event).await?;
        Ok(id)
    }
}

fn json_id_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalize a wire customer into upsert form.
fn customer_record(wire: &ShopifyCustomer) -> NewCustomer {
    NewCustomer {
        shopify_customer_id: wire.id.to_string(),
        email: wire.email.clone(),
        first_name: wire.first_name.clone(),
        last_name: wire.last_name.clone(),
        phone: wire.phone.clone(),
        orders_count: wire.orders_count.unwrap_or(0),
        total_spent: wire.total_spent.unwrap_or_default(),
        state: wire.state.clone(),
        tags: wire.tag_list(),
        shopify_created_at: wire.created_at,
        shopify_updated_at: wire.updated_at,
    }
}

/// Normalize a wire product into upsert form.
fn product_record(wire: &ShopifyProduct) -> NewProduct {
    NewProduct {
        shopify_product_id: wire.id.to_string(),
        title: wire.title.clone(),
        vendor: wire.vendor.clone(),
        product_type: wire.product_type.clone(),
        status: wire.status.clone(),
        tags: wire.tag_list(),
        handle: wire.handle.clone(),
        shopify_created_at: wire.created_at,
        shopify_updated_at: wire.updated_at,
    }
}
