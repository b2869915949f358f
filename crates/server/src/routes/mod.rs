//! HTTP route handlers for the API server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/auth/register               - Register tenant + dashboard user
//! POST /api/auth/login                  - Login, establishes session
//! POST /api/auth/logout                 - Logout, clears session
//!
//! # Webhooks (HMAC-verified, tenant resolved by shop domain header)
//! POST /api/webhooks/shopify/customers  - Customer create/update
//! POST /api/webhooks/shopify/orders     - Order create/update
//! POST /api/webhooks/shopify/products   - Product create/update
//! POST /api/webhooks/shopify/carts      - Abandoned cart event
//!
//! # Sync
//! POST /api/sync                        - Manual sync for the session tenant
//! POST /api/sync/scheduled              - All-tenants sync (cron bearer token)
//! GET  /api/sync/trigger                - All-tenants sync (development only)
//!
//! # Analytics (requires auth, scoped to the session tenant)
//! GET  /api/analytics/summary           - Aggregates and daily series
//! ```

pub mod analytics;
pub mod auth;
pub mod sync;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the webhook routes router.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(webhooks::customer))
        .route("/orders", post(webhooks::order))
        .route("/products", post(webhooks::product))
        .route("/carts", post(webhooks::cart))
}

/// Create the sync routes router.
pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(sync::trigger))
        .route("/scheduled", post(sync::scheduled))
        .route("/trigger", get(sync::dev_trigger))
}

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/summary", get(analytics::summary))
}

/// Create all routes for the API server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/webhooks/shopify", webhook_routes())
        .nest("/api/sync", sync_routes())
        .nest("/api/analytics", analytics_routes())
}
