// src/handlers/storage.rs

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermStorageRecount, PermStorageUpload, PermStorageView, RequirePermission},
        tenancy::TenantContext,
    },
    models::storage::{StorageStatus, StoredObject},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Caminho relativo à pasta da empresa, ex.: `ariza/2025/foto.jpg`
    pub path: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteQuery {
    /// Chave completa, ex.: `companies/{id}/ariza/foto.jpg`
    pub key: String,
}

// POST /api/storage/upload?path=...
#[utoipa::path(
    post,
    path = "/api/storage/upload",
    tag = "Storage",
    params(UploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Arquivo gravado e uso contabilizado", body = StoredObject),
        (status = 400, description = "Caminho inválido"),
        (status = 413, description = "Arquivo grande demais ou cota excedida")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_file(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermStorageUpload>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let stored = app_state
        .storage_service
        .upload(tenant.0, &query.path, &body)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(stored)))
}

// DELETE /api/storage/files?key=...
#[utoipa::path(
    delete,
    path = "/api/storage/files",
    tag = "Storage",
    params(DeleteQuery),
    responses(
        (status = 204, description = "Arquivo removido"),
        (status = 404, description = "Arquivo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_file(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermStorageUpload>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .storage_service
        .delete(tenant.0, &query.key)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/storage/status
#[utoipa::path(
    get,
    path = "/api/storage/status",
    tag = "Storage",
    responses((status = 200, description = "Uso, limite e nível de alerta", body = StorageStatus)),
    security(("api_jwt" = []))
)]
pub async fn get_status(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermStorageView>,
) -> Result<impl IntoResponse, ApiError> {
    let status = app_state
        .storage_service
        .status(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(status))
}

// POST /api/storage/recount
#[utoipa::path(
    post,
    path = "/api/storage/recount",
    tag = "Storage",
    responses((status = 200, description = "Uso recalculado a partir do armazenamento", body = StorageStatus)),
    security(("api_jwt" = []))
)]
pub async fn recount(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermStorageRecount>,
) -> Result<impl IntoResponse, ApiError> {
    let status = app_state
        .storage_service
        .recount(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(status))
}
