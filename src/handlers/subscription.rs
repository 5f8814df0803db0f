// src/handlers/subscription.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermCompanySettings, RequirePermission},
        tenancy::TenantContext,
    },
    models::{
        plan::{Plan, SubscriptionInfo, UsageSummary},
        upgrade::{CreateUpgradeRequestPayload, UpgradeRequest},
    },
};

// GET /api/subscription
#[utoipa::path(
    get,
    path = "/api/subscription",
    tag = "Subscription",
    responses((status = 200, description = "Plano atual e situação da assinatura", body = SubscriptionInfo)),
    security(("api_jwt" = []))
)]
pub async fn get_subscription(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let info = app_state
        .subscription_service
        .subscription_info(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(info))
}

// GET /api/subscription/usage
#[utoipa::path(
    get,
    path = "/api/subscription/usage",
    tag = "Subscription",
    responses((status = 200, description = "Uso atual frente aos limites do plano", body = UsageSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_usage(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let usage = app_state
        .subscription_service
        .usage_summary(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(usage))
}

// GET /api/subscription/plans
#[utoipa::path(
    get,
    path = "/api/subscription/plans",
    tag = "Subscription",
    responses((status = 200, description = "Catálogo de planos (padrão + remoto)", body = [Plan])),
    security(("api_jwt" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .plan_service
        .merged_plans()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let catalog: Vec<Plan> = plans.values().cloned().collect();
    Ok(Json(catalog))
}

// GET /api/subscription/features/{name}
#[utoipa::path(
    get,
    path = "/api/subscription/features/{name}",
    tag = "Subscription",
    params(("name" = String, Path, description = "Nome do recurso, ex.: exportPdf")),
    responses((status = 200, description = "Se o plano atual libera o recurso")),
    security(("api_jwt" = []))
)]
pub async fn get_feature(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let enabled = app_state
        .subscription_service
        .has_feature(tenant.0, &name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(json!({ "feature": name, "enabled": enabled })))
}

// POST /api/subscription/upgrade-requests
#[utoipa::path(
    post,
    path = "/api/subscription/upgrade-requests",
    tag = "Subscription",
    request_body = CreateUpgradeRequestPayload,
    responses(
        (status = 201, description = "Pedido de upgrade registrado", body = UpgradeRequest),
        (status = 404, description = "Plano inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_upgrade_request(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCompanySettings>,
    Json(payload): Json<CreateUpgradeRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state
        .upgrade_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/subscription/upgrade-requests
#[utoipa::path(
    get,
    path = "/api/subscription/upgrade-requests",
    tag = "Subscription",
    responses((status = 200, description = "Pedidos da empresa", body = [UpgradeRequest])),
    security(("api_jwt" = []))
)]
pub async fn list_upgrade_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermCompanySettings>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .upgrade_service
        .list_for_company(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(requests))
}
