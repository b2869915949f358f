//! Order repository for database operations.

use sqlx::PgPool;

use storepulse_core::{OrderId, TenantId};

use super::RepositoryError;
use crate::models::{NewOrder, NewOrderItem};

/// Repository for order and order-item database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite an order header keyed by `(tenant, external id)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        tenant_id: TenantId,
        record: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (
                tenant_id, shopify_order_id, customer_id, order_number, email,
                financial_status, fulfillment_status, total_price, subtotal_price,
                total_tax, currency, billing_address, shipping_address,
                shopify_created_at, shopify_updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (tenant_id, shopify_order_id) DO UPDATE SET
                customer_id = EXCLUDED.customer_id,
                order_number = EXCLUDED.order_number,
                email = EXCLUDED.email,
                financial_status = EXCLUDED.financial_status,
                fulfillment_status = EXCLUDED.fulfillment_status,
                total_price = EXCLUDED.total_price,
                subtotal_price = EXCLUDED.subtotal_price,
                total_tax = EXCLUDED.total_tax,
                currency = EXCLUDED.currency,
                billing_address = EXCLUDED.billing_address,
                shipping_address = EXCLUDED.shipping_address,
                shopify_updated_at = EXCLUDED.shopify_updated_at,
                updated_at = now()
            RETURNING id
            ",
        )
        .bind(tenant_id)
        .bind(&record.shopify_order_id)
        .bind(record.customer_id)
        .bind(record.order_number)
        .bind(&record.email)
        .bind(&record.financial_status)
        .bind(&record.fulfillment_status)
        .bind(record.total_price)
        .bind(record.subtotal_price)
        .bind(record.total_tax)
        .bind(&record.currency)
        .bind(&record.billing_address)
        .bind(&record.shipping_address)
        .bind(record.shopify_created_at)
        .bind(record.shopify_updated_at)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    /// Destructively replace all items owned by an order.
    ///
    /// Runs delete and inserts in one transaction so readers never observe a
    /// half-replaced item set. The order must belong to the given tenant; the
    /// delete is scoped through the orders table to enforce this.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn replace_items(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM order_items
            WHERE order_id = $1
              AND order_id IN (SELECT id FROM orders WHERE tenant_id = $2)
            ",
        )
        .bind(order_id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items (
                    order_id, product_id, shopify_product_id, shopify_variant_id,
                    title, quantity, price
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.shopify_product_id)
            .bind(&item.shopify_variant_id)
            .bind(&item.title)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
