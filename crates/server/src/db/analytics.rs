//! Tenant-scoped analytics aggregate queries.
//!
//! Thin read layer over the synced entities: totals, revenue sums, top
//! customers by spend, and time-bucketed daily series. Money stays in
//! `Decimal` end to end; no binary floating point.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use storepulse_core::{CustomerId, TenantId};

use super::RepositoryError;

/// One day's revenue.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

/// One day's record count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// A top customer by total spend.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopCustomer {
    pub id: CustomerId,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_spent: Decimal,
    pub orders_count: i64,
}

/// Repository for analytics aggregate queries.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Total customers for a tenant (not date-bounded).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_customers(&self, tenant_id: TenantId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Orders placed within the date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_orders(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders \
             WHERE tenant_id = $1 AND shopify_created_at BETWEEN $2 AND $3",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Revenue summed over the date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_revenue(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, RepositoryError> {
        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0) FROM orders \
             WHERE tenant_id = $1 AND shopify_created_at BETWEEN $2 AND $3",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_one(self.pool)
        .await?;

        Ok(revenue)
    }

    /// Daily revenue series over the date range, ascending by day.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_by_day(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyRevenue>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyRevenue>(
            r"
            SELECT shopify_created_at::date AS date, SUM(total_price) AS revenue
            FROM orders
            WHERE tenant_id = $1 AND shopify_created_at BETWEEN $2 AND $3
            GROUP BY shopify_created_at::date
            ORDER BY date ASC
            ",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Daily order counts over the date range, ascending by day.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn orders_by_day(
        &self,
        tenant_id: TenantId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r"
            SELECT shopify_created_at::date AS date, COUNT(*) AS count
            FROM orders
            WHERE tenant_id = $1 AND shopify_created_at BETWEEN $2 AND $3
            GROUP BY shopify_created_at::date
            ORDER BY date ASC
            ",
        )
        .bind(tenant_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Daily new-customer counts (by local creation time).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn customer_growth_by_day(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<DailyCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyCount>(
            r"
            SELECT created_at::date AS date, COUNT(*) AS count
            FROM customers
            WHERE tenant_id = $1
            GROUP BY created_at::date
            ORDER BY date ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Top-N customers by total spend.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_customers(
        &self,
        tenant_id: TenantId,
        limit: i64,
    ) -> Result<Vec<TopCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, TopCustomer>(
            r"
            SELECT id, email, first_name, last_name, total_spent, orders_count
            FROM customers
            WHERE tenant_id = $1
            ORDER BY total_spent DESC
            LIMIT $2
            ",
        )
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
