//! Customer repository for database operations.

use sqlx::PgPool;

use storepulse_core::{CustomerId, TenantId};

use super::RepositoryError;
use crate::models::{Customer, NewCustomer};

const CUSTOMER_COLUMNS: &str = "id, tenant_id, shopify_customer_id, email, first_name, last_name, \
     phone, orders_count, total_spent, state, tags, shopify_created_at, shopify_updated_at, \
     created_at, updated_at";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite a customer keyed by `(tenant, external id)`.
    ///
    /// Mutable fields are overwritten wholesale; last write wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        tenant_id: TenantId,
        record: &NewCustomer,
    ) -> Result<CustomerId, RepositoryError> {
        let id: CustomerId = sqlx::query_scalar(
            r"
            INSERT INTO customers (
                tenant_id, shopify_customer_id, email, first_name, last_name, phone,
                orders_count, total_spent, state, tags, shopify_created_at, shopify_updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (tenant_id, shopify_customer_id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                orders_count = EXCLUDED.orders_count,
                total_spent = EXCLUDED.total_spent,
                state = EXCLUDED.state,
                tags = EXCLUDED.tags,
                shopify_updated_at = EXCLUDED.shopify_updated_at,
                updated_at = now()
            RETURNING id
            ",
        )
        .bind(tenant_id)
        .bind(&record.shopify_customer_id)
        .bind(&record.email)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.phone)
        .bind(record.orders_count)
        .bind(record.total_spent)
        .bind(&record.state)
        .bind(&record.tags)
        .bind(record.shopify_created_at)
        .bind(record.shopify_updated_at)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Find a customer by its external customer id within one tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_customer_id: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE tenant_id = $1 AND shopify_customer_id = $2"
        ))
        .bind(tenant_id)
        .bind(shopify_customer_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Find a customer by email within one tenant.
    ///
    /// Fallback match key used only when an order payload carries no embedded
    /// customer. Multiple rows may share an email; the oldest row wins so the
    /// match is deterministic.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        tenant_id: TenantId,
        email: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE tenant_id = $1 AND email = $2 ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }
}
