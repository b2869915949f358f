//! Webhook ingestion route handlers.
//!
//! Every delivery goes through the same gate, in order: both Shopify headers
//! must be present (400), the shop domain must resolve to a known tenant
//! (404), and the HMAC signature must verify against that tenant's secret
//! over the raw body bytes (401). Only then is the body parsed and handed to
//! the same reconciliation paths the full sync uses.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::db::tenants::TenantRepository;
use crate::error::AppError;
use crate::models::Tenant;
use crate::shopify::webhook::verify_signature;
use crate::state::AppState;
use crate::sync::{PgStore, ReconcileError, Reconciler};

/// Shopify's HMAC signature header.
const HMAC_HEADER: &str = "x-shopify-hmac-sha256";
/// Shopify's shop domain header, used as the tenant key.
const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// Resolve the tenant and verify the delivery signature.
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<Tenant, AppError> {
    let signature = headers
        .get(HMAC_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing HMAC signature header".to_owned()))?;

    let shop_domain = headers
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing shop domain header".to_owned()))?;

    let tenant = TenantRepository::new(state.pool())
        .get_by_shop_domain(shop_domain)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("unknown shop domain: {shop_domain}")))?;

    if !verify_signature(body, signature, tenant.webhook_secret.expose_secret()) {
        return Err(AppError::Unauthorized(
            "webhook signature verification failed".to_owned(),
        ));
    }

    Ok(tenant)
}

fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

fn map_reconcile(e: ReconcileError) -> AppError {
    match e {
        ReconcileError::Validation { resource, reason } => {
            AppError::BadRequest(format!("invalid {resource} payload: {reason}"))
        }
        ReconcileError::Store(inner) => inner.into(),
    }
}

fn received() -> Json<Value> {
    Json(json!({ "received": true }))
}

/// Handle a customer create/update webhook.
#[instrument(skip_all)]
pub async fn customer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let tenant = authenticate(&state, &headers, &body).await?;
    let payload = parse_body(&body)?;

    let store = PgStore::new(state.pool().clone());
    let id = Reconciler::new(&store, tenant.id)
        .upsert_customer(&payload)
        .await
        .map_err(map_reconcile)?;

    info!(tenant_id = %tenant.id, customer_id = %id, "customer webhook applied");
    Ok(received())
}

/// Handle an order create/update webhook.
#[instrument(skip_all)]
pub async fn order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let tenant = authenticate(&state, &headers, &body).await?;
    let payload = parse_body(&body)?;

    let store = PgStore::new(state.pool().clone());
    let id = Reconciler::new(&store, tenant.id)
        .upsert_order(&payload)
        .await
        .map_err(map_reconcile)?;

    info!(tenant_id = %tenant.id, order_id = %id, "order webhook applied");
    Ok(received())
}

/// Handle a product create/update webhook.
#[instrument(skip_all)]
pub async fn product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let tenant = authenticate(&state, &headers, &body).await?;
    let payload = parse_body(&body)?;

    let store = PgStore::new(state.pool().clone());
    let id = Reconciler::new(&store, tenant.id)
        .upsert_product(&payload)
        .await
        .map_err(map_reconcile)?;

    info!(tenant_id = %tenant.id, product_id = %id, "product webhook applied");
    Ok(received())
}

/// Handle an abandoned-cart webhook.
#[instrument(skip_all)]
pub async fn cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let tenant = authenticate(&state, &headers, &body).await?;
    let payload = parse_body(&body)?;

    let store = PgStore::new(state.pool().clone());
    let id = Reconciler::new(&store, tenant.id)
        .append_cart_event(&payload)
        .await
        .map_err(map_reconcile)?;

    info!(tenant_id = %tenant.id, event_id = %id, "cart event recorded");
    Ok(received())
}
