//! Full-sync orchestration across resources and tenants.
//!
//! One tenant's sync walks products, then customers, then orders, so order
//! reconciliation can resolve references against already-synced rows. Each
//! tenant runs under a wall-clock deadline; in the all-tenants loop a failed
//! tenant is reported and skipped, never allowed to block the rest.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use storepulse_core::TenantId;

use crate::db::RepositoryError;
use crate::models::Tenant;
use crate::shopify::{PlatformApi, PlatformConnector, Resource, ShopifyError};

use super::reconcile::{ReconcileError, Reconciler};
use super::store::EntityStore;

/// Errors that abort one tenant's sync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The platform API could not be reached or returned an error.
    #[error("platform error: {0}")]
    Transport(#[from] ShopifyError),

    /// Local persistence failed.
    #[error("store error: {0}")]
    Store(#[from] RepositoryError),

    /// The tenant's wall-clock deadline elapsed mid-sync.
    #[error("sync deadline exceeded")]
    DeadlineExceeded,
}

/// Counters for one tenant's completed sync.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncOutcome {
    pub products: u64,
    pub customers: u64,
    pub orders: u64,
    /// Records dropped for failing validation.
    pub skipped: u64,
}

/// Result of one tenant's slot in the all-tenants loop.
#[derive(Debug, Serialize)]
pub struct TenantSyncReport {
    pub tenant_id: TenantId,
    pub shop_domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SyncOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TenantSyncReport {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Drives full syncs over an [`EntityStore`] and a [`PlatformConnector`].
pub struct SyncEngine<S, C> {
    store: S,
    connector: C,
    tenant_deadline: Duration,
}

impl<S: EntityStore, C: PlatformConnector> SyncEngine<S, C> {
    /// Create an engine with a per-tenant wall-clock deadline.
    #[must_use]
    pub const fn new(store: S, connector: C, tenant_deadline: Duration) -> Self {
        Self {
            store,
            connector,
            tenant_deadline,
        }
    }

    /// Run a full sync for one tenant under the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DeadlineExceeded`] if the deadline elapses, or
    /// the first transport/store error encountered.
    pub async fn sync_tenant(&self, tenant: &Tenant) -> Result<SyncOutcome, SyncError> {
        tokio::time::timeout(self.tenant_deadline, self.sync_tenant_inner(tenant))
            .await
            .map_err(|_| SyncError::DeadlineExceeded)?
    }

    async fn sync_tenant_inner(&self, tenant: &Tenant) -> Result<SyncOutcome, SyncError> {
        info!(tenant_id = %tenant.id, shop_domain = %tenant.shop_domain, "starting full sync");

        let api = self.connector.connect(tenant)?;
        let reconciler = Reconciler::new(&self.store, tenant.id);
        let mut outcome = SyncOutcome::default();

        // Products before customers before orders: order reconciliation
        // resolves references against rows written by the earlier passes.
        for resource in [Resource::Products, Resource::Customers, Resource::Orders] {
            self.sync_resource(&api, &reconciler, tenant, resource, &mut outcome)
                .await?;
        }

        info!(
            tenant_id = %tenant.id,
            products = outcome.products,
            customers = outcome.customers,
            orders = outcome.orders,
            skipped = outcome.skipped,
            "full sync complete"
        );
        Ok(outcome)
    }

    async fn sync_resource(
        &self,
        api: &C::Api,
        reconciler: &Reconciler<'_, S>,
        tenant: &Tenant,
        resource: Resource,
        outcome: &mut SyncOutcome,
    ) -> Result<(), SyncError> {
        let mut cursor = None;

        loop {
            let page = api.fetch_page(resource, cursor.as_ref()).await?;

            for record in &page.records {
                let result = match resource {
                    Resource::Products => reconciler.upsert_product(record).await.map(|_| ()),
                    Resource::Customers => reconciler.upsert_customer(record).await.map(|_| ()),
                    Resource::Orders => reconciler.upsert_order(record).await.map(|_| ()),
                };

                match result {
                    Ok(()) => match resource {
                        Resource::Products => outcome.products += 1,
                        Resource::Customers => outcome.customers += 1,
                        Resource::Orders => outcome.orders += 1,
                    },
                    Err(ReconcileError::Validation { resource, reason }) => {
                        warn!(
                            tenant_id = %tenant.id,
                            resource,
                            reason,
                            "skipping invalid record"
                        );
                        outcome.skipped += 1;
                    }
                    Err(ReconcileError::Store(e)) => return Err(SyncError::Store(e)),
                }
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(())
    }

    /// Sync every active tenant sequentially.
    ///
    /// One tenant's failure is captured in its report; the loop continues.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] only if the tenant list itself cannot be
    /// loaded.
    pub async fn sync_all_tenants(&self) -> Result<Vec<TenantSyncReport>, SyncError> {
        let tenants = self.store.list_active_tenants().await?;
        let mut reports = Vec::with_capacity(tenants.len());

        for tenant in &tenants {
            let report = match self.sync_tenant(tenant).await {
                Ok(outcome) => TenantSyncReport {
                    tenant_id: tenant.id,
                    shop_domain: tenant.shop_domain.clone(),
                    outcome: Some(outcome),
                    error: None,
                },
                Err(e) => {
                    warn!(
                        tenant_id = %tenant.id,
                        shop_domain = %tenant.shop_domain,
                        error = %e,
                        "tenant sync failed"
                    );
                    TenantSyncReport {
                        tenant_id: tenant.id,
                        shop_domain: tenant.shop_domain.clone(),
                        outcome: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            reports.push(report);
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sync::testing::{MemStore, ScriptedApi, ScriptedConnector, test_tenant};

    const DEADLINE: Duration = Duration::from_secs(5);

    fn engine(
        store: MemStore,
        connector: ScriptedConnector,
    ) -> SyncEngine<MemStore, ScriptedConnector> {
        SyncEngine::new(store, connector, DEADLINE)
    }

    #[tokio::test]
    async fn test_full_sync_counts_all_resources() {
        let store = MemStore::new();
        let tenant = test_tenant("acme.myshopify.com");

        let api = ScriptedApi::new()
            .with_page(Resource::Products, vec![json!({"id": 77, "title": "Widget"})])
            .with_page(
                Resource::Customers,
                vec![json!({"id": 501, "email": "buyer@shop.example"})],
            )
            .with_page(
                Resource::Orders,
                vec![json!({
                    "id": 9001,
                    "customer": {"id": 501},
                    "line_items": [{"product_id": 77, "quantity": 1, "price": "19.99"}]
                })],
            );
        let connector = ScriptedConnector::new().with_api("acme.myshopify.com", api);

        let engine = engine(store, connector);
        let outcome = engine.sync_tenant(&tenant).await.unwrap();

        assert_eq!(outcome.products, 1);
        assert_eq!(outcome.customers, 1);
        assert_eq!(outcome.orders, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[tokio::test]
    async fn test_sync_walks_all_pages() {
        let store = MemStore::new();
        let tenant = test_tenant("acme.myshopify.com");

        let api = ScriptedApi::new()
            .with_page(Resource::Customers, vec![json!({"id": 1}), json!({"id": 2})])
            .with_page(Resource::Customers, vec![json!({"id": 3})]);
        let connector = ScriptedConnector::new().with_api("acme.myshopify.com", api);

        let engine = engine(store, connector);
        let outcome = engine.sync_tenant(&tenant).await.unwrap();

        assert_eq!(outcome.customers, 3);
    }

    #[tokio::test]
    async fn test_invalid_record_is_skipped_not_fatal() {
        let store = MemStore::new();
        let tenant = test_tenant("acme.myshopify.com");

        let api = ScriptedApi::new().with_page(
            Resource::Customers,
            vec![
                json!({"id": 1, "email": "a@shop.example"}),
                json!({"email": "no-id@shop.example"}),
                json!({"id": 2, "email": "b@shop.example"}),
            ],
        );
        let connector = ScriptedConnector::new().with_api("acme.myshopify.com", api);

        let engine = engine(store, connector);
        let outcome = engine.sync_tenant(&tenant).await.unwrap();

        assert_eq!(outcome.customers, 2);
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn test_order_sync_resolves_product_synced_same_run() {
        let store = MemStore::new();
        let tenant = test_tenant("acme.myshopify.com");

        let api = ScriptedApi::new()
            .with_page(Resource::Products, vec![json!({"id": 77, "title": "Widget"})])
            .with_page(
                Resource::Orders,
                vec![json!({
                    "id": 9001,
                    "line_items": [{"product_id": 77, "quantity": 1, "price": "19.99"}]
                })],
            );
        let connector = ScriptedConnector::new().with_api("acme.myshopify.com", api);

        let engine = engine(store, connector);
        engine.sync_tenant(&tenant).await.unwrap();

        let orders = engine.store.orders();
        let items = engine.store.items_for(orders[0].id);
        assert!(items[0].product_id.is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_tenant() {
        let store = MemStore::new();
        let tenant = test_tenant("down.myshopify.com");
        let connector = ScriptedConnector::new().with_api("down.myshopify.com", ScriptedApi::failing());

        let engine = engine(store, connector);
        let err = engine.sync_tenant(&tenant).await.unwrap_err();

        assert!(matches!(err, SyncError::Transport(_)));
    }

    #[tokio::test]
    async fn test_one_failing_tenant_does_not_block_the_rest() {
        let store = MemStore::new();
        let tenant_a = test_tenant("a.myshopify.com");
        let tenant_b = test_tenant("b.myshopify.com");
        let tenant_c = test_tenant("c.myshopify.com");
        store.add_tenant(tenant_a.clone());
        store.add_tenant(tenant_b.clone());
        store.add_tenant(tenant_c.clone());

        let ok_api = ScriptedApi::new()
            .with_page(Resource::Customers, vec![json!({"id": 1})]);
        let connector = ScriptedConnector::new()
            .with_api("a.myshopify.com", ok_api.clone())
            .with_api("b.myshopify.com", ScriptedApi::failing())
            .with_api("c.myshopify.com", ok_api);

        let engine = engine(store, connector);
        let reports = engine.sync_all_tenants().await.unwrap();

        assert_eq!(reports.len(), 3);
        assert!(reports[0].succeeded());
        assert!(!reports[1].succeeded());
        assert!(reports[1].error.is_some());
        assert!(reports[2].succeeded());
    }

    #[tokio::test]
    async fn test_inactive_tenants_are_not_synced() {
        let store = MemStore::new();
        let mut inactive = test_tenant("gone.myshopify.com");
        inactive.is_active = false;
        store.add_tenant(inactive);

        let engine = engine(store, ScriptedConnector::new());
        let reports = engine.sync_all_tenants().await.unwrap();

        assert!(reports.is_empty());
    }
}
