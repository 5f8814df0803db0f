// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    models::auth::{Role, User},
};

// Superadmin pode operar sobre outra empresa com este cabeçalho
pub const COMPANY_ID_HEADER: &str = "x-company-id";

/// Empresa (tenant) alvo da requisição. Inserida pelo `auth_guard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext(pub Uuid);

/// Empresa do usuário, ou a do cabeçalho quando o usuário é superadmin.
pub fn resolve_tenant(user: &User, headers: &HeaderMap) -> Result<TenantContext, AppError> {
    let Some(value) = headers.get(COMPANY_ID_HEADER) else {
        return Ok(TenantContext(user.company_id));
    };

    if user.role != Role::SuperAdmin {
        return Err(AppError::Forbidden("tenant.switch"));
    }

    value
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .map(TenantContext)
        .ok_or(AppError::CompanyNotFound)
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<TenantContext>().copied().ok_or(ApiError {
            status: StatusCode::BAD_REQUEST,
            error: "Tenant context missing".into(),
            details: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            email: "x@example.com".into(),
            password_hash: String::new(),
            full_name: "X".into(),
            phone: None,
            role,
            sites: vec![],
            plants: vec![],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn defaults_to_the_users_company() {
        let manager = user(Role::Manager);
        let tenant = resolve_tenant(&manager, &HeaderMap::new()).unwrap();
        assert_eq!(tenant, TenantContext(manager.company_id));
    }

    #[test]
    fn superadmin_can_target_another_company() {
        let target = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(COMPANY_ID_HEADER, HeaderValue::from_str(&target.to_string()).unwrap());

        let tenant = resolve_tenant(&user(Role::SuperAdmin), &headers).unwrap();
        assert_eq!(tenant, TenantContext(target));
    }

    #[test]
    fn other_roles_cannot_switch_company() {
        let mut headers = HeaderMap::new();
        headers.insert(COMPANY_ID_HEADER, HeaderValue::from_static("2b0c3c1e-0000-0000-0000-000000000000"));
        assert!(matches!(
            resolve_tenant(&user(Role::Manager), &headers),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(COMPANY_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(resolve_tenant(&user(Role::SuperAdmin), &headers).is_err());
    }
}
