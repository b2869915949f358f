//! Tenant repository for database operations.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use sqlx::PgPool;

use storepulse_core::TenantId;

use super::RepositoryError;
use crate::models::{NewTenant, Tenant};

/// Row shape for tenant queries; secrets are wrapped before leaving this module.
#[derive(sqlx::FromRow)]
struct TenantRow {
    id: TenantId,
    name: String,
    shop_domain: String,
    access_token: String,
    webhook_secret: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            shop_domain: row.shop_domain,
            access_token: SecretString::from(row.access_token),
            webhook_secret: SecretString::from(row.webhook_secret),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TENANT_COLUMNS: &str =
    "id, name, shop_domain, access_token, webhook_secret, is_active, created_at, updated_at";

/// Repository for tenant database operations.
pub struct TenantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a tenant by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: TenantId) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// Resolve a tenant by its unique shop domain (the webhook tenant key).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_shop_domain(
        &self,
        shop_domain: &str,
    ) -> Result<Option<Tenant>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE shop_domain = $1"
        ))
        .bind(shop_domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Tenant::from))
    }

    /// List all active tenants, in registration order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Tenant>, RepositoryError> {
        let rows = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE is_active ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    /// Create a new tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the shop domain is already
    /// registered, `RepositoryError::Database` for other database errors.
    pub async fn create(&self, tenant: &NewTenant) -> Result<Tenant, RepositoryError> {
        use secrecy::ExposeSecret;

        let row = sqlx::query_as::<_, TenantRow>(&format!(
            r"
            INSERT INTO tenants (id, name, shop_domain, access_token, webhook_secret)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TENANT_COLUMNS}
            "
        ))
        .bind(TenantId::generate())
        .bind(&tenant.name)
        .bind(&tenant.shop_domain)
        .bind(tenant.access_token.expose_secret())
        .bind(tenant.webhook_secret.expose_secret())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("shop domain already registered".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }
}
