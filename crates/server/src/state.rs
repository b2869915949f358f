//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::shopify::AdminConnector;
use crate::sync::{PgStore, SyncEngine};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and database pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Build a sync engine wired to Postgres and the live Admin API.
    #[must_use]
    pub fn sync_engine(&self) -> SyncEngine<PgStore, AdminConnector> {
        let sync = &self.inner.config.sync;
        SyncEngine::new(
            PgStore::new(self.inner.pool.clone()),
            AdminConnector {
                api_version: sync.api_version.clone(),
                page_limit: sync.page_limit,
                timeout: sync.fetch_timeout,
            },
            sync.tenant_deadline,
        )
    }
}
