//! In-memory test doubles for the sync pipeline.
//!
//! [`MemStore`] mirrors the Postgres store's upsert/lookup semantics over
//! plain vectors; [`ScriptedConnector`] serves canned pages per shop domain.
//! Together they let reconciliation and engine behavior be tested without a
//! database or network.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use secrecy::SecretString;

use storepulse_core::{CustomerId, EventId, OrderId, OrderItemId, ProductId, TenantId};

use crate::db::RepositoryError;
use crate::models::{
    CustomEvent, Customer, NewCustomer, NewEvent, NewOrder, NewOrderItem, NewProduct, Order,
    OrderItem, Product, Tenant,
};
use crate::shopify::{Page, PageCursor, PlatformApi, PlatformConnector, Resource, ShopifyError};

use super::EntityStore;

/// Build a tenant fixture with a fresh id.
pub fn test_tenant(shop_domain: &str) -> Tenant {
    let now = Utc::now();
    Tenant {
        id: TenantId::generate(),
        name: shop_domain.split('.').next().unwrap_or("shop").to_owned(),
        shop_domain: shop_domain.to_owned(),
        access_token: SecretString::from("shpat_test_token"),
        webhook_secret: SecretString::from("shpss_test_secret"),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
struct MemInner {
    tenants: Vec<Tenant>,
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
    items: HashMap<OrderId, Vec<OrderItem>>,
    events: Vec<CustomEvent>,
    next_id: i64,
}

impl MemInner {
    fn alloc(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`EntityStore`] with the same upsert semantics as Postgres.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<MemInner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant so `list_active_tenants` returns it.
    pub fn add_tenant(&self, tenant: Tenant) {
        self.lock().tenants.push(tenant);
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.lock().customers.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    pub fn items_for(&self, order_id: OrderId) -> Vec<OrderItem> {
        self.lock().items.get(&order_id).cloned().unwrap_or_default()
    }

    pub fn events(&self) -> Vec<CustomEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemInner> {
        self.inner.lock().unwrap()
    }
}

impl EntityStore for MemStore {
    async fn list_active_tenants(&self) -> Result<Vec<Tenant>, RepositoryError> {
        Ok(self
            .lock()
            .tenants
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    async fn upsert_customer(
        &self,
        tenant_id: TenantId,
        record: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError> {
        let mut inner = self.lock();
        if let Some(existing) = inner.customers.iter_mut().find(|c| {
            c.tenant_id == tenant_id && c.shopify_customer_id == record.shopify_customer_id
        }) {
            existing.email = record.email.clone();
            existing.first_name = record.first_name.clone();
            existing.last_name = record.last_name.clone();
            existing.phone = record.phone.clone();
            existing.orders_count = record.orders_count;
            existing.total_spent = record.total_spent;
            existing.state = record.state.clone();
            existing.tags = record.tags.clone();
            existing.shopify_updated_at = record.shopify_updated_at;
            existing.updated_at = Utc::now();
            return Ok(existing.id);
        }

        let id = CustomerId::new(inner.alloc());
        let now = Utc::now();
        inner.customers.push(Customer {
            id,
            tenant_id,
            shopify_customer_id: record.shopify_customer_id.clone(),
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            phone: record.phone.clone(),
            orders_count: record.orders_count,
            total_spent: record.total_spent,
            state: record.state.clone(),
            tags: record.tags.clone(),
            shopify_created_at: record.shopify_created_at,
            shopify_updated_at: record.shopify_updated_at,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_customer_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_customer_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        Ok(self
            .lock()
            .customers
            .iter()
            .find(|c| c.tenant_id == tenant_id && c.shopify_customer_id == shopify_customer_id)
            .cloned())
    }

    async fn find_customer_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        // Oldest row wins, matching the SQL ORDER BY created_at ASC LIMIT 1.
        Ok(self
            .lock()
            .customers
            .iter()
            .filter(|c| c.tenant_id == tenant_id && c.email.as_deref() == Some(email))
            .min_by_key(|c| c.created_at)
            .cloned())
    }

    async fn upsert_product(
        &self,
        tenant_id: TenantId,
        record: &NewProduct,
    ) -> Result<ProductId, RepositoryError> {
        let mut inner = self.lock();
        if let Some(existing) = inner.products.iter_mut().find(|p| {
            p.tenant_id == tenant_id && p.shopify_product_id == record.shopify_product_id
        }) {
            existing.title = record.title.clone();
            existing.vendor = record.vendor.clone();
            existing.product_type = record.product_type.clone();
            existing.status = record.status.clone();
            existing.tags = record.tags.clone();
            existing.handle = record.handle.clone();
            existing.shopify_updated_at = record.shopify_updated_at;
            existing.updated_at = Utc::now();
            return Ok(existing.id);
        }

        let id = ProductId::new(inner.alloc());
        let now = Utc::now();
        inner.products.push(Product {
            id,
            tenant_id,
            shopify_product_id: record.shopify_product_id.clone(),
            title: record.title.clone(),
            vendor: record.vendor.clone(),
            product_type: record.product_type.clone(),
            status: record.status.clone(),
            tags: record.tags.clone(),
            handle: record.handle.clone(),
            shopify_created_at: record.shopify_created_at,
            shopify_updated_at: record.shopify_updated_at,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_product_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_product_id: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .lock()
            .products
            .iter()
            .find(|p| p.tenant_id == tenant_id && p.shopify_product_id == shopify_product_id)
            .cloned())
    }

    async fn upsert_order(
        &self,
        tenant_id: TenantId,
        record: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let mut inner = self.lock();
        if let Some(existing) = inner
            .orders
            .iter_mut()
            .find(|o| o.tenant_id == tenant_id && o.shopify_order_id == record.shopify_order_id)
        {
            existing.customer_id = record.customer_id;
            existing.order_number = record.order_number;
            existing.email = record.email.clone();
            existing.financial_status = record.financial_status.clone();
            existing.fulfillment_status = record.fulfillment_status.clone();
            existing.total_price = record.total_price;
            existing.subtotal_price = record.subtotal_price;
            existing.total_tax = record.total_tax;
            existing.currency = record.currency.clone();
            existing.billing_address = record.billing_address.clone();
            existing.shipping_address = record.shipping_address.clone();
            existing.shopify_updated_at = record.shopify_updated_at;
            existing.updated_at = Utc::now();
            return Ok(existing.id);
        }

        let id = OrderId::new(inner.alloc());
        let now = Utc::now();
        inner.orders.push(Order {
            id,
            tenant_id,
            shopify_order_id: record.shopify_order_id.clone(),
            customer_id: record.customer_id,
            order_number: record.order_number,
            email: record.email.clone(),
            financial_status: record.financial_status.clone(),
            fulfillment_status: record.fulfillment_status.clone(),
            total_price: record.total_price,
            subtotal_price: record.subtotal_price,
            total_tax: record.total_tax,
            currency: record.currency.clone(),
            billing_address: record.billing_address.clone(),
            shipping_address: record.shipping_address.clone(),
            shopify_created_at: record.shopify_created_at,
            shopify_updated_at: record.shopify_updated_at,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn replace_order_items(
        &self,
        _tenant_id: TenantId,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let rows = items
            .iter()
            .map(|item| {
                let id = OrderItemId::new(inner.alloc());
                OrderItem {
                    id,
                    order_id,
                    product_id: item.product_id,
                    shopify_product_id: item.shopify_product_id.clone(),
                    shopify_variant_id: item.shopify_variant_id.clone(),
                    title: item.title.clone(),
                    quantity: item.quantity,
                    price: item.price,
                }
            })
            .collect();
        inner.items.insert(order_id, rows);
        Ok(())
    }

    async fn append_event(
        &self,
        tenant_id: TenantId,
        event: &NewEvent,
    ) -> Result<EventId, RepositoryError> {
        let mut inner = self.lock();
        let id = EventId::new(inner.alloc());
        inner.events.push(CustomEvent {
            id,
            tenant_id,
            event_type: event.event_type.clone(),
            shopify_customer_id: event.shopify_customer_id.clone(),
            email: event.email.clone(),
            payload: event.payload.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

/// Canned page sequences per resource, served in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedApi {
    pages: HashMap<&'static str, Vec<Vec<serde_json::Value>>>,
    fail: bool,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one page of records for a resource; pages are served in insertion
    /// order.
    #[must_use]
    pub fn with_page(mut self, resource: Resource, records: Vec<serde_json::Value>) -> Self {
        self.pages.entry(resource.path()).or_default().push(records);
        self
    }

    /// Make every fetch fail with a 500.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            pages: HashMap::new(),
            fail: true,
        }
    }
}

impl PlatformApi for ScriptedApi {
    async fn fetch_page(
        &self,
        resource: Resource,
        cursor: Option<&PageCursor>,
    ) -> Result<Page, ShopifyError> {
        if self.fail {
            return Err(ShopifyError::Api {
                status: 500,
                message: "scripted failure".to_owned(),
            });
        }

        let index: usize = match cursor {
            Some(PageCursor(token)) => token.parse().map_err(|_| ShopifyError::Parse(
                format!("bad scripted cursor: {token}"),
            ))?,
            None => 0,
        };

        let scripted = self.pages.get(resource.path());
        let records = scripted
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default();
        let next = match scripted {
            Some(pages) if index + 1 < pages.len() => Some(PageCursor((index + 1).to_string())),
            _ => None,
        };

        Ok(Page { records, next })
    }
}

/// Connector handing out scripted APIs keyed by shop domain.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    apis: HashMap<String, ScriptedApi>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api(mut self, shop_domain: &str, api: ScriptedApi) -> Self {
        self.apis.insert(shop_domain.to_owned(), api);
        self
    }
}

impl PlatformConnector for ScriptedConnector {
    type Api = ScriptedApi;

    fn connect(&self, tenant: &Tenant) -> Result<Self::Api, ShopifyError> {
        Ok(self
            .apis
            .get(&tenant.shop_domain)
            .cloned()
            .unwrap_or_default())
    }
}
