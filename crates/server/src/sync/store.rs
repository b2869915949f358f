//! The persistence seam for the sync pipeline.
//!
//! [`EntityStore`] is the narrow interface reconciliation writes through.
//! Production uses [`PgStore`] over the repository layer; tests substitute an
//! in-memory implementation so reconciliation semantics can be checked
//! without a database.

use sqlx::PgPool;

use storepulse_core::{CustomerId, EventId, OrderId, ProductId, TenantId};

use crate::db::{
    CustomerRepository, EventRepository, OrderRepository, ProductRepository, RepositoryError,
    TenantRepository,
};
use crate::models::{
    Customer, NewCustomer, NewEvent, NewOrder, NewOrderItem, NewProduct, Product, Tenant,
};

/// Entity persistence operations needed by reconciliation and the sync engine.
///
/// Every operation is tenant-scoped; implementations must never let a lookup
/// or write cross a tenant boundary.
#[allow(async_fn_in_trait)]
pub trait EntityStore {
    /// List tenants eligible for syncing.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the lookup fails.
    async fn list_active_tenants(&self) -> Result<Vec<Tenant>, RepositoryError>;

    /// Insert or overwrite a customer keyed by `(tenant, external id)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn upsert_customer(
        &self,
        tenant_id: TenantId,
        record: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError>;

    /// Find a customer by external id within one tenant.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the lookup fails.
    async fn find_customer_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_customer_id: &str,
    ) -> Result<Option<Customer>, RepositoryError>;

    /// Find a customer by email within one tenant; oldest row wins.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the lookup fails.
    async fn find_customer_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<Customer>, RepositoryError>;

    /// Insert or overwrite a product keyed by `(tenant, external id)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn upsert_product(
        &self,
        tenant_id: TenantId,
        record: &NewProduct,
    ) -> Result<ProductId, RepositoryError>;

    /// Find a product by external id within one tenant.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the lookup fails.
    async fn find_product_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_product_id: &str,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Insert or overwrite an order header keyed by `(tenant, external id)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn upsert_order(
        &self,
        tenant_id: TenantId,
        record: &NewOrder,
    ) -> Result<OrderId, RepositoryError>;

    /// Destructively replace the items owned by an order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn replace_order_items(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError>;

    /// Append a custom event to the append-only log.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the write fails.
    async fn append_event(
        &self,
        tenant_id: TenantId,
        event: &NewEvent,
    ) -> Result<EventId, RepositoryError>;
}

/// Postgres-backed [`EntityStore`] delegating to the repository layer.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EntityStore for PgStore {
    async fn list_active_tenants(&self) -> Result<Vec<Tenant>, RepositoryError> {
        TenantRepository::new(&self.pool).list_active().await
    }

    async fn upsert_customer(
        &self,
        tenant_id: TenantId,
        record: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError> {
        CustomerRepository::new(&self.pool)
            .upsert(tenant_id, record)
            .await
    }

    async fn find_customer_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_customer_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool)
            .find_by_external_id(tenant_id, shopify_customer_id)
            .await
    }

    async fn find_customer_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        CustomerRepository::new(&self.pool)
            .find_by_email(tenant_id, email)
            .await
    }

    async fn upsert_product(
        &self,
        tenant_id: TenantId,
        record: &NewProduct,
    ) -> Result<ProductId, RepositoryError> {
        ProductRepository::new(&self.pool)
            .upsert(tenant_id, record)
            .await
    }

    async fn find_product_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_product_id: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        ProductRepository::new(&self.pool)
            .find_by_external_id(tenant_id, shopify_product_id)
            .await
    }

    async fn upsert_order(
        &self,
        tenant_id: TenantId,
        record: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        OrderRepository::new(&self.pool)
            .upsert(tenant_id, record)
            .await
    }

    async fn replace_order_items(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        OrderRepository::new(&self.pool)
            .replace_items(tenant_id, order_id, items)
            .await
    }

    async fn append_event(
        &self,
        tenant_id: TenantId,
        event: &NewEvent,
    ) -> Result<EventId, RepositoryError> {
        EventRepository::new(&self.pool)
            .append(tenant_id, event)
            .await
    }
}
