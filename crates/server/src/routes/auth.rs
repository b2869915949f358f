//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, TenantSummary, UserSummary};
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub store_name: String,
    pub shop_domain: String,
    pub access_token: String,
    pub webhook_secret: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub tenant: TenantSummary,
    pub user: UserSummary,
}

/// Register a tenant and its dashboard user, then establish a session.
#[instrument(skip_all, fields(shop_domain = %request.shop_domain))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let service = AuthService::new(state.pool());
    let (tenant, user) = service
        .register(Registration {
            store_name: &request.store_name,
            shop_domain: &request.shop_domain,
            access_token: &request.access_token,
            webhook_secret: &request.webhook_secret,
            email: &request.email,
            password: &request.password,
            user_name: request.name.as_deref(),
        })
        .await?;

    let current = CurrentUser {
        id: user.id,
        tenant_id: user.tenant_id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to establish session: {e}")))?;

    info!(tenant_id = %tenant.id, user_id = %user.id, "registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            tenant: TenantSummary::from(&tenant),
            user: UserSummary::from(&user),
        }),
    ))
}

/// Login with email and password, establishing a session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let service = AuthService::new(state.pool());
    let user = service.login(&request.email, &request.password).await?;

    let current = CurrentUser {
        id: user.id,
        tenant_id: user.tenant_id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to establish session: {e}")))?;

    info!(user_id = %user.id, "logged in");
    Ok(Json(UserSummary::from(&user)))
}

/// Logout, clearing the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<Value>, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(json!({ "logged_out": true })))
}
