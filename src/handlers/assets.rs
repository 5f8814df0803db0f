// src/handlers/assets.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
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
        rbac::{PermAssetManage, PermAssetView, RequirePermission},
        tenancy::TenantContext,
    },
    models::asset::{AssetFilter, CreateAssetPayload, UpdateAssetPayload},
};

// GET /api/assets?category=&siteId=&plantId=&search=&pageSize=&before=
pub async fn list_assets(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetView>,
    Query(filter): Query<AssetFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .asset_service
        .list(&user.0, tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// POST /api/assets
pub async fn create_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetManage>,
    Json(payload): Json<CreateAssetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let asset = app_state
        .asset_service
        .create(&user.0, tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(asset)))
}

// GET /api/assets/{id}
pub async fn get_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let asset = app_state
        .asset_service
        .get(&user.0, tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(asset))
}

// PUT /api/assets/{id}
pub async fn update_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let asset = app_state
        .asset_service
        .update(&user.0, tenant.0, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(asset))
}

// DELETE /api/assets/{id}
pub async fn delete_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetManage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .asset_service
        .delete(tenant.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/assets/{id}/label
pub async fn asset_label(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermAssetView>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let asset = app_state.asset_service.find(&user.0, tenant.0, id).await.map_err(to_api)?;
    let company = app_state.subscription_service.load_company(tenant.0).await.map_err(to_api)?;

    let pdf_bytes = app_state
        .document_service
        .asset_label_pdf(&company.name, &asset)
        .map_err(to_api)?;

    // Etiqueta com QR para impressão
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("inline; filename=\"etiket_{}.pdf\"", asset.id)),
    ];

    Ok((headers, pdf_bytes).into_response())
}
