//! Product repository for database operations.

use sqlx::PgPool;

use storepulse_core::{ProductId, TenantId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, tenant_id, shopify_product_id, title, vendor, product_type, \
     status, tags, handle, shopify_created_at, shopify_updated_at, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite a product keyed by `(tenant, external id)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        tenant_id: TenantId,
        record: &NewProduct,
    ) -> Result<ProductId, RepositoryError> {
        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO products (
                tenant_id, shopify_product_id, title, vendor, product_type, status,
                tags, handle, shopify_created_at, shopify_updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (tenant_id, shopify_product_id) DO UPDATE SET
                title = EXCLUDED.title,
                vendor = EXCLUDED.vendor,
                product_type = EXCLUDED.product_type,
                status = EXCLUDED.status,
                tags = EXCLUDED.tags,
                handle = EXCLUDED.handle,
                shopify_updated_at = EXCLUDED.shopify_updated_at,
                updated_at = now()
            RETURNING id
            ",
        )
        .bind(tenant_id)
        .bind(&record.shopify_product_id)
        .bind(&record.title)
        .bind(&record.vendor)
        .bind(&record.product_type)
        .bind(&record.status)
        .bind(&record.tags)
        .bind(&record.handle)
        .bind(record.shopify_created_at)
        .bind(record.shopify_updated_at)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Find a product by its external product id within one tenant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_external_id(
        &self,
        tenant_id: TenantId,
        shopify_product_id: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND shopify_product_id = $2"
        ))
        .bind(tenant_id)
        .bind(shopify_product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }
}
