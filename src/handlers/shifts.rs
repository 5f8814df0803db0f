// src/handlers/shifts.rs

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
        rbac::{PermShiftCreate, PermShiftDelete, PermShiftEdit, PermShiftView, RequirePermission},
        tenancy::TenantContext,
    },
    models::shift::{CreateShiftPayload, ShiftFilter, UpdateShiftPayload},
};

// GET /api/shifts?siteId=&createdBy=&from=&to=&urgentOnly=
pub async fn list_shifts(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
    Query(filter): Query<ShiftFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .shift_service
        .list(&user.0, tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// POST /api/shifts
pub async fn create_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftCreate>,
    Json(payload): Json<CreateShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .shift_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(report)))
}

// GET /api/shifts/today
pub async fn list_today(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .shift_service
        .today(&user.0, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// GET /api/shifts/urgent
pub async fn list_urgent(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .shift_service
        .urgent(&user.0, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// GET /api/shifts/mine
pub async fn list_mine(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .shift_service
        .mine(&user.0, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// GET /api/shifts/sites/{site_id}
pub async fn list_by_site(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
    Path(site_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = app_state
        .shift_service
        .by_site(&user.0, tenant.0, site_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(reports))
}

// GET /api/shifts/{id}
pub async fn get_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .shift_service
        .get(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}

// PUT /api/shifts/{id}
pub async fn update_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShiftPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .shift_service
        .update(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(report))
}

// DELETE /api/shifts/{id}
pub async fn delete_shift(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermShiftDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .shift_service
        .delete(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
