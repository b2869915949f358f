//! Tenant model.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use storepulse_core::TenantId;

/// One customer organization/store, the unit of data partitioning.
///
/// Owns every other entity; no query may cross a tenant boundary. The API
/// credential and webhook secret are set at registration and only change via
/// re-registration.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// Unique external shop domain (e.g., `acme.myshopify.com`).
    pub shop_domain: String,
    /// Admin API access token for this tenant's store.
    pub access_token: SecretString,
    /// Shared secret for webhook HMAC verification.
    pub webhook_secret: SecretString,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a tenant at registration.
#[derive(Debug)]
pub struct NewTenant {
    pub name: String,
    pub shop_domain: String,
    pub access_token: SecretString,
    pub webhook_secret: SecretString,
}

/// Public view of a tenant, safe to serialize in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary {
    pub id: TenantId,
    pub name: String,
    pub shop_domain: String,
    pub is_active: bool,
}

impl From<&Tenant> for TenantSummary {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name.clone(),
            shop_domain: tenant.shop_domain.clone(),
            is_active: tenant.is_active,
        }
    }
}
