// src/handlers/faults.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermFaultCreate, PermFaultDelete, PermFaultEdit, PermFaultResolve, PermFaultView, RequirePermission},
        tenancy::TenantContext,
    },
    models::fault::{CreateFaultPayload, FaultFilter, ResolveFaultPayload, UpdateFaultPayload},
};

// GET /api/faults?status=&priority=&siteId=&search=
pub async fn list_faults(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultView>,
    Query(filter): Query<FaultFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let faults = app_state
        .fault_service
        .list(&user.0, tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(faults))
}

// POST /api/faults
pub async fn create_fault(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultCreate>,
    Json(payload): Json<CreateFaultPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fault = app_state
        .fault_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(fault)))
}

// GET /api/faults/statistics
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultView>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .fault_service
        .statistics(&user.0, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stats))
}

// GET /api/faults/{id}
pub async fn get_fault(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let fault = app_state
        .fault_service
        .get(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(fault))
}

// PUT /api/faults/{id}
pub async fn update_fault(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFaultPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fault = app_state
        .fault_service
        .update(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(fault))
}

// POST /api/faults/{id}/resolve
pub async fn resolve_fault(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultResolve>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResolveFaultPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let fault = app_state
        .fault_service
        .resolve(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(fault))
}

// DELETE /api/faults/{id}
pub async fn delete_fault(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermFaultDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .fault_service
        .delete(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
