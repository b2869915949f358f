//! Manual sync commands.
//!
//! Runs the same sync engine the server schedules, from the command line.
//! Useful for the first sync after registering a tenant and for re-syncing
//! after an outage without waiting for the next interval.

use thiserror::Error;

use storepulse_server::config::{AppConfig, ConfigError};
use storepulse_server::db::{self, RepositoryError, TenantRepository};
use storepulse_server::state::AppState;
use storepulse_server::sync::SyncError;

/// Errors from running a manual sync.
#[derive(Debug, Error)]
pub enum SyncCommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("no tenant registered for shop domain: {0}")]
    UnknownTenant(String),

    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),
}

async fn connect() -> Result<AppState, SyncCommandError> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    Ok(AppState::new(config, pool))
}

/// Run a full sync for one tenant identified by shop domain.
///
/// # Errors
///
/// Returns `SyncCommandError` if the tenant is unknown or the sync fails.
pub async fn one_tenant(shop_domain: &str) -> Result<(), SyncCommandError> {
    let state = connect().await?;

    let tenant = TenantRepository::new(state.pool())
        .get_by_shop_domain(shop_domain)
        .await?
        .ok_or_else(|| SyncCommandError::UnknownTenant(shop_domain.to_owned()))?;

    tracing::info!(shop_domain, "Syncing tenant...");
    let outcome = state.sync_engine().sync_tenant(&tenant).await?;

    tracing::info!(
        products = outcome.products,
        customers = outcome.customers,
        orders = outcome.orders,
        skipped = outcome.skipped,
        "Sync complete"
    );
    Ok(())
}

/// Run a full sync for every active tenant.
///
/// # Errors
///
/// Returns `SyncCommandError` if the tenant list cannot be loaded. Individual
/// tenant failures are reported but do not fail the command.
pub async fn all_tenants() -> Result<(), SyncCommandError> {
    let state = connect().await?;

    tracing::info!("Syncing all active tenants...");
    let reports = state.sync_engine().sync_all_tenants().await?;

    for report in &reports {
        match (&report.outcome, &report.error) {
            (Some(outcome), _) => tracing::info!(
                shop_domain = %report.shop_domain,
                products = outcome.products,
                customers = outcome.customers,
                orders = outcome.orders,
                skipped = outcome.skipped,
                "Tenant synced"
            ),
            (None, error) => tracing::warn!(
                shop_domain = %report.shop_domain,
                error = error.as_deref().unwrap_or("unknown"),
                "Tenant sync failed"
            ),
        }
    }

    tracing::info!(tenants = reports.len(), "All-tenants sync finished");
    Ok(())
}
