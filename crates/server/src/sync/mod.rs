//! Data synchronization pipeline.
//!
//! Pulls products, customers, and orders from each active tenant's store and
//! reconciles them into local state. The same reconciliation paths serve both
//! full paginated syncs and single-record webhook deliveries, so the two
//! ingestion routes can never drift apart.
//!
//! # Architecture
//!
//! - [`store`] - the persistence seam ([`EntityStore`]) with the Postgres
//!   implementation
//! - [`reconcile`] - per-record normalization and upsert logic
//! - [`engine`] - pagination walking, resource ordering, per-tenant deadlines,
//!   and the all-tenants loop

pub mod engine;
pub mod reconcile;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use engine::{SyncEngine, SyncError, SyncOutcome, TenantSyncReport};
pub use reconcile::{ReconcileError, Reconciler};
pub use store::{EntityStore, PgStore};
