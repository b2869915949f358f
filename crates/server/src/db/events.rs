//! Custom event repository for database operations.

use sqlx::PgPool;

use storepulse_core::{EventId, TenantId};

use super::RepositoryError;
use crate::models::NewEvent;

/// Repository for the append-only custom event log.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a custom event. Events are never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append(
        &self,
        tenant_id: TenantId,
        event: &NewEvent,
    ) -> Result<EventId, RepositoryError> {
        let id: EventId = sqlx::query_scalar(
            r"
            INSERT INTO custom_events (tenant_id, event_type, shopify_customer_id, email, payload)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(tenant_id)
        .bind(&event.event_type)
        .bind(&event.shopify_customer_id)
        .bind(&event.email)
        .bind(&event.payload)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}
