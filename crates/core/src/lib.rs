//! Storepulse Core - Shared types library.
//!
//! This crate provides common types used across all Storepulse components:
//! - `server` - Webhook ingestion, sync engine, and analytics API
//! - `cli` - Command-line tools for migrations and one-off syncs
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email addresses, and vendor-tag normalization

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
