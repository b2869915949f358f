//! Analytics route handlers.
//!
//! All aggregates are computed in the database over the session tenant's
//! rows; money stays `Decimal` from the orders table to the JSON response.

use axum::{Json, extract::{Query, State}};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::analytics::{AnalyticsRepository, DailyCount, DailyRevenue, TopCustomer};
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Number of customers returned in the top-spenders list.
const TOP_CUSTOMER_LIMIT: i64 = 5;

/// Optional date bounds; defaults cover all history up to now.
#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Aggregate analytics for one tenant over a date range.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub revenue_by_day: Vec<DailyRevenue>,
    pub orders_by_day: Vec<DailyCount>,
    pub customer_growth_by_day: Vec<DailyCount>,
    pub top_customers: Vec<TopCustomer>,
}

/// Aggregates and daily series for the session tenant.
#[instrument(skip_all, fields(tenant_id = %user.tenant_id))]
pub async fn summary(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(range): Query<DateRange>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let from = range.from.unwrap_or(DateTime::UNIX_EPOCH);
    let to = range.to.unwrap_or_else(Utc::now);
    let tenant_id = user.tenant_id;

    let repo = AnalyticsRepository::new(state.pool());

    let total_customers = repo.total_customers(tenant_id).await?;
    let total_orders = repo.total_orders(tenant_id, from, to).await?;
    let total_revenue = repo.total_revenue(tenant_id, from, to).await?;
    let revenue_by_day = repo.revenue_by_day(tenant_id, from, to).await?;
    let orders_by_day = repo.orders_by_day(tenant_id, from, to).await?;
    let customer_growth_by_day = repo.customer_growth_by_day(tenant_id).await?;
    let top_customers = repo.top_customers(tenant_id, TOP_CUSTOMER_LIMIT).await?;

    let average_order_value = if total_orders > 0 {
        total_revenue / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    Ok(Json(AnalyticsSummary {
        total_customers,
        total_orders,
        total_revenue,
        average_order_value,
        revenue_by_day,
        orders_by_day,
        customer_growth_by_day,
        top_customers,
    }))
}
