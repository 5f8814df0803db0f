// src/handlers/sites.rs

use axum::{
    extract::{Path, State},
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
        rbac::{PermSitesManage, PermSitesView, RequirePermission},
        tenancy::TenantContext,
    },
    models::site::{CreatePlantPayload, CreateSitePayload, PowerPlant, Site},
};

// GET /api/sites
#[utoipa::path(
    get,
    path = "/api/sites",
    tag = "Sites",
    responses((status = 200, description = "Sahalar visíveis ao usuário", body = [Site])),
    security(("api_jwt" = []))
)]
pub async fn list_sites(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesView>,
) -> Result<impl IntoResponse, ApiError> {
    let sites = app_state
        .site_service
        .list_sites(tenant.0, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(sites))
}

// POST /api/sites
#[utoipa::path(
    post,
    path = "/api/sites",
    tag = "Sites",
    request_body = CreateSitePayload,
    responses(
        (status = 201, description = "Saha criada", body = Site),
        (status = 402, description = "Limite de sahalar do plano atingido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_site(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesManage>,
    Json(payload): Json<CreateSitePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let site = app_state
        .site_service
        .create_site(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(site)))
}

// DELETE /api/sites/{id}
pub async fn delete_site(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesManage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .site_service
        .delete_site(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/sites/plants
#[utoipa::path(
    get,
    path = "/api/sites/plants",
    tag = "Sites",
    responses((status = 200, description = "Santraller visíveis ao usuário", body = [PowerPlant])),
    security(("api_jwt" = []))
)]
pub async fn list_plants(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesView>,
) -> Result<impl IntoResponse, ApiError> {
    let plants = app_state
        .site_service
        .list_plants(tenant.0, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plants))
}

// POST /api/sites/plants
#[utoipa::path(
    post,
    path = "/api/sites/plants",
    tag = "Sites",
    request_body = CreatePlantPayload,
    responses(
        (status = 201, description = "Santral criada", body = PowerPlant),
        (status = 402, description = "Limite de santraller do plano atingido"),
        (status = 404, description = "Saha não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesManage>,
    Json(payload): Json<CreatePlantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let plant = app_state
        .site_service
        .create_plant(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(plant)))
}

// DELETE /api/sites/plants/{id}
pub async fn delete_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermSitesManage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .site_service
        .delete_plant(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
