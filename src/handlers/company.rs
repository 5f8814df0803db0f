// src/handlers/company.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermCompanySettings, RequirePermission},
        tenancy::TenantContext,
    },
    models::company::{Company, UpdateCompanyPayload},
};

// GET /api/company
#[utoipa::path(
    get,
    path = "/api/company",
    tag = "Company",
    responses((status = 200, description = "Dados da empresa", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .subscription_service
        .load_company(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(company))
}

// PUT /api/company
#[utoipa::path(
    put,
    path = "/api/company",
    tag = "Company",
    request_body = UpdateCompanyPayload,
    responses((status = 200, description = "Empresa atualizada", body = Company)),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequirePermission<PermCompanySettings>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .subscription_service
        .update_company(tenant.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(company))
}
