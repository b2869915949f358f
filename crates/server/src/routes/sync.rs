//! Sync trigger route handlers.
//!
//! Three ways in, three auth schemes: the session-authenticated manual
//! trigger syncs only the caller's tenant; the scheduler endpoint syncs every
//! active tenant behind a bearer token; and a development-only unauthenticated
//! trigger exists for local testing and answers 403 anywhere else.

use axum::{Json, extract::State, http::HeaderMap};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::db::tenants::TenantRepository;
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::sync::{SyncOutcome, TenantSyncReport};

/// Manually sync the session tenant.
#[instrument(skip_all, fields(tenant_id = %user.tenant_id))]
pub async fn trigger(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<SyncOutcome>, AppError> {
    let tenant = TenantRepository::new(state.pool())
        .get_by_id(user.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("tenant not found".to_owned()))?;

    let outcome = state.sync_engine().sync_tenant(&tenant).await?;
    Ok(Json(outcome))
}

/// Sync every active tenant; called by the external scheduler.
///
/// Authenticated by a bearer token matching the configured cron secret.
#[instrument(skip_all)]
pub async fn scheduled(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TenantSyncReport>>, AppError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

    if token != state.config().cron_secret.expose_secret() {
        return Err(AppError::Unauthorized("invalid cron secret".to_owned()));
    }

    let reports = state.sync_engine().sync_all_tenants().await?;
    Ok(Json(reports))
}

/// Unauthenticated all-tenants sync, reachable only in development.
#[instrument(skip_all)]
pub async fn dev_trigger(
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantSyncReport>>, AppError> {
    if state.config().environment.is_production() {
        return Err(AppError::Forbidden(
            "development trigger is disabled in production".to_owned(),
        ));
    }

    let reports = state.sync_engine().sync_all_tenants().await?;
    Ok(Json(reports))
}
