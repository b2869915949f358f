//! Storepulse server - multi-tenant storefront analytics.
//!
//! Ingests e-commerce data (customers, orders, products, cart events) from
//! Shopify via webhooks and periodic polling sync, persists it per tenant in
//! `PostgreSQL`, and serves aggregated analytics to a dashboard.
//!
//! # Architecture
//!
//! - [`shopify`] - REST client with cursor pagination and webhook signature
//!   verification
//! - [`sync`] - the sync engine: entity reconciler plus per-tenant orchestrator
//! - [`routes`] - webhook dispatcher, sync triggers, analytics, registration
//! - [`db`] - tenant-scoped repositories over sqlx
//!
//! Both the webhook dispatcher and the sync orchestrator terminate in the
//! entity reconciler, which is the single writer of truth for entity upserts.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
pub mod sync;
