// src/handlers/maintenance.rs

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
        rbac::{
            PermMaintenanceCreate, PermMaintenanceDelete, PermMaintenanceEdit, PermMaintenanceView,
            RequirePermission,
        },
        tenancy::TenantContext,
    },
    models::maintenance::{CreateMaintenancePayload, MaintenanceFilter, UpdateMaintenancePayload},
};

// GET /api/maintenance?kind=&plantId=&limit=
pub async fn list_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceView>,
    Query(filter): Query<MaintenanceFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let records = app_state
        .maintenance_service
        .list(&user.0, tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(records))
}

// POST /api/maintenance
pub async fn create_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceCreate>,
    Json(payload): Json<CreateMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .maintenance_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(record)))
}

// GET /api/maintenance/statistics
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceView>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .maintenance_service
        .statistics(&user.0, tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stats))
}

// GET /api/maintenance/plants/{plant_id}/history
pub async fn get_plant_history(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceView>,
    Path(plant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .maintenance_service
        .plant_history(&user.0, tenant.0, plant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(history))
}

// GET /api/maintenance/plants/{plant_id}/plan
pub async fn get_plant_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceView>,
    Path(plant_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .maintenance_service
        .plan_for_plant(&user.0, tenant.0, plant_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plan))
}

// GET /api/maintenance/{id}
pub async fn get_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = app_state
        .maintenance_service
        .get(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(record))
}

// PUT /api/maintenance/{id}
pub async fn update_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaintenancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .maintenance_service
        .update(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(record))
}

// DELETE /api/maintenance/{id}
pub async fn delete_maintenance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermMaintenanceDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .maintenance_service
        .delete(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
