//! Database operations for the analytics store.
//!
//! # Tables
//!
//! - `tenants` - registered stores with API credential and webhook secret
//! - `users` - dashboard users (one tenant each)
//! - `tower_sessions.session` - tower-sessions storage
//! - `customers`, `products`, `orders`, `order_items` - synced entities,
//!   keyed by `(tenant_id, shopify_*_id)`
//! - `custom_events` - append-only side-channel signals
//!
//! Every repository method takes a tenant id and scopes its query to it;
//! cross-tenant reads are not expressible through this layer.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p storepulse-cli -- migrate
//! ```

pub mod analytics;
pub mod customers;
pub mod events;
pub mod orders;
pub mod products;
pub mod tenants;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::AnalyticsRepository;
pub use customers::CustomerRepository;
pub use events::EventRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use tenants::TenantRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
