// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
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
    models::payment::{ConfirmCheckoutPayload, PaymentSession, StartCheckoutPayload},
};

// POST /api/payments/checkout
#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    tag = "Payments",
    request_body = StartCheckoutPayload,
    responses(
        (status = 201, description = "Sessão de pagamento simulada aberta", body = PaymentSession),
        (status = 404, description = "Plano inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCompanySettings>,
    Json(payload): Json<StartCheckoutPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let session = app_state
        .payment_service
        .start_checkout(&user.0, tenant.0, &payload.plan_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(session)))
}

// POST /api/payments/checkout/{token}/confirm
#[utoipa::path(
    post,
    path = "/api/payments/checkout/{token}/confirm",
    tag = "Payments",
    params(("token" = String, Path, description = "Token da sessão")),
    request_body = ConfirmCheckoutPayload,
    responses(
        (status = 200, description = "Sessão concluída; sucesso aplica o plano", body = PaymentSession),
        (status = 404, description = "Sessão inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_checkout(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermCompanySettings>,
    Path(token): Path<String>,
    Json(payload): Json<ConfirmCheckoutPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = app_state
        .payment_service
        .confirm(&user.0, tenant.0, &token, payload.success)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(session))
}
