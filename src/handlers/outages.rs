// src/handlers/outages.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermOutageCreate, PermOutageDelete, PermOutageEdit, PermOutageView, RequirePermission},
        tenancy::TenantContext,
    },
    models::outage::{CreateOutagePayload, OutageFilter, UpdateOutagePayload},
};

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsQuery {
    pub year: Option<i32>,
}

// GET /api/outages?siteId=&from=&to=&ongoingOnly=
pub async fn list_outages(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageView>,
    Query(filter): Query<OutageFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let outages = app_state
        .outage_service
        .list(&user.0, tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outages))
}

// POST /api/outages
pub async fn create_outage(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageCreate>,
    Json(payload): Json<CreateOutagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let outage = app_state
        .outage_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(outage)))
}

// GET /api/outages/statistics?year=2025
pub async fn get_statistics(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageView>,
    Query(query): Query<StatisticsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .outage_service
        .statistics(&user.0, tenant.0, query.year)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stats))
}

// GET /api/outages/{id}
pub async fn get_outage(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outage = app_state
        .outage_service
        .get(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outage))
}

// PUT /api/outages/{id}
pub async fn update_outage(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOutagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let outage = app_state
        .outage_service
        .update(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outage))
}

// DELETE /api/outages/{id}
pub async fn delete_outage(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermOutageDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .outage_service
        .delete(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
