// src/handlers/admin.rs
// Rotas exclusivas do superadmin da plataforma.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, rbac::RequireSuperAdmin},
    models::{
        company::Company,
        plan::{AssignPlanPayload, PlanMap},
        storage::RecountSummary,
        upgrade::{RejectUpgradePayload, UpgradeRequest, UpgradeRequestFilter},
    },
};

// GET /api/admin/plans
#[utoipa::path(
    get,
    path = "/api/admin/plans",
    tag = "Admin",
    responses((status = 200, description = "Planos mesclados, indexados por id", body = serde_json::Value)),
    security(("api_jwt" = []))
)]
pub async fn get_plans(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireSuperAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .plan_service
        .merged_plans()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plans.as_ref().clone()))
}

// PUT /api/admin/plans
#[utoipa::path(
    put,
    path = "/api/admin/plans",
    tag = "Admin",
    request_body = serde_json::Value,
    responses((status = 200, description = "Documento de planos substituído", body = serde_json::Value)),
    security(("api_jwt" = []))
)]
pub async fn save_plans(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _admin: RequireSuperAdmin,
    Json(plans): Json<PlanMap>,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    app_state.plan_service.save_plans(&plans, user.0.id).await.map_err(to_api)?;
    let merged = app_state.plan_service.merged_plans().await.map_err(to_api)?;

    Ok(Json(merged.as_ref().clone()))
}

// PATCH /api/admin/plans/{plan_id}
#[utoipa::path(
    patch,
    path = "/api/admin/plans/{plan_id}",
    tag = "Admin",
    params(("plan_id" = String, Path, description = "Id do plano")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Plano atualizado parcialmente", body = serde_json::Value),
        (status = 404, description = "Plano inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _admin: RequireSuperAdmin,
    Path(plan_id): Path<String>,
    Json(partial): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = app_state
        .plan_service
        .update_plan(&plan_id, &partial, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plans))
}

// GET /api/admin/companies
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    tag = "Admin",
    responses((status = 200, description = "Todas as empresas", body = [Company])),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireSuperAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .subscription_service
        .list_companies()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(companies))
}

// POST /api/admin/companies/{id}/plan
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/plan",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Id da empresa")),
    request_body = AssignPlanPayload,
    responses(
        (status = 200, description = "Plano aplicado à empresa", body = Company),
        (status = 404, description = "Empresa ou plano inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _admin: RequireSuperAdmin,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<AssignPlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .subscription_service
        .apply_plan(company_id, &payload.plan_id, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(company))
}

// GET /api/admin/upgrade-requests?status=pending
#[utoipa::path(
    get,
    path = "/api/admin/upgrade-requests",
    tag = "Admin",
    params(("status" = Option<String>, Query, description = "pending | approved | rejected")),
    responses((status = 200, description = "Pedidos de upgrade", body = [UpgradeRequest])),
    security(("api_jwt" = []))
)]
pub async fn list_upgrade_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireSuperAdmin,
    Query(filter): Query<UpgradeRequestFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .upgrade_service
        .list(filter.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(requests))
}

// POST /api/admin/upgrade-requests/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/upgrade-requests/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Id do pedido")),
    responses(
        (status = 200, description = "Pedido aprovado e plano aplicado", body = UpgradeRequest),
        (status = 409, description = "Pedido já decidido")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_upgrade(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _admin: RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .upgrade_service
        .approve(&user.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(request))
}

// POST /api/admin/upgrade-requests/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/upgrade-requests/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Id do pedido")),
    request_body = RejectUpgradePayload,
    responses(
        (status = 200, description = "Pedido rejeitado", body = UpgradeRequest),
        (status = 409, description = "Pedido já decidido")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_upgrade(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _admin: RequireSuperAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectUpgradePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .upgrade_service
        .reject(&user.0, id, payload.reason.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(request))
}

// POST /api/admin/storage/recount-all
#[utoipa::path(
    post,
    path = "/api/admin/storage/recount-all",
    tag = "Admin",
    responses((status = 200, description = "Resumo do recálculo de todas as empresas", body = RecountSummary)),
    security(("api_jwt" = []))
)]
pub async fn recount_all(
    State(app_state): State<AppState>,
    locale: Locale,
    _admin: RequireSuperAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .storage_service
        .recount_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(summary))
}
