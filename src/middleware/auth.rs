// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::resolve_tenant},
    models::auth::{Role, User},
};

// Usuário autenticado, inserido nas extensions pelo `auth_guard`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Valida o Bearer token, carrega o usuário e resolve a empresa alvo.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| to_api(AppError::InvalidToken))?;

    let user = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(to_api)?;

    let tenant = resolve_tenant(&user, request.headers()).map_err(to_api)?;

    // Empresa inativa bloqueia todos menos o superadmin
    let company = app_state
        .subscription_service
        .load_company(tenant.0)
        .await
        .map_err(to_api)?;
    if !company.is_active && user.role != Role::SuperAdmin {
        return Err(to_api(AppError::CompanyInactive));
    }

    request.extensions_mut().insert(tenant);
    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthenticatedUser>().cloned().ok_or(ApiError {
            status: StatusCode::UNAUTHORIZED,
            error: "Unauthenticated".into(),
            details: None,
        })
    }
}
