// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erro de domínio/serviço. Os handlers convertem para `ApiError` com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Auth ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário inativo")]
    UserInactive,

    #[error("Papel inválido para esta operação")]
    InvalidRole,

    // --- Tenancy ---
    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Empresa inativa")]
    CompanyInactive,

    #[error("Permissão necessária: {0}")]
    Forbidden(&'static str),

    // --- Limites do plano ---
    #[error("Limite do plano atingido para {resource} ({limit})")]
    LimitExceeded { resource: &'static str, limit: i64 },

    #[error("Cota de armazenamento excedida ({used_mb} MB / {limit_mb} MB)")]
    StorageQuotaExceeded { used_mb: f64, limit_mb: i64 },

    // --- Domínio ---
    #[error("Registro não encontrado: {0}")]
    RecordNotFound(&'static str),

    #[error("Estoque não pode ficar negativo")]
    NegativeStock,

    #[error("Plano não encontrado: {0}")]
    PlanNotFound(String),

    #[error("A solicitação não está pendente")]
    InvalidRequestState,

    #[error("Arquivo excede o limite de {max_mb} MB")]
    FileTooLarge { max_mb: u64 },

    #[error("Caminho de arquivo inválido")]
    InvalidPath,

    // --- Infraestrutura ---
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de armazenamento: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada em {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar o relatório: {0}")]
    ExportError(String),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Resposta HTTP de erro
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::UserInactive => (StatusCode::FORBIDDEN, "user_inactive"),
            AppError::InvalidRole => (StatusCode::BAD_REQUEST, "invalid_role"),
            AppError::CompanyNotFound => (StatusCode::NOT_FOUND, "company_not_found"),
            AppError::CompanyInactive => (StatusCode::FORBIDDEN, "company_inactive"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::LimitExceeded { .. } => (StatusCode::PAYMENT_REQUIRED, "limit_exceeded"),
            AppError::StorageQuotaExceeded { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "storage_quota_exceeded")
            }
            AppError::RecordNotFound(_) => (StatusCode::NOT_FOUND, "record_not_found"),
            AppError::NegativeStock => (StatusCode::UNPROCESSABLE_ENTITY, "negative_stock"),
            AppError::PlanNotFound(_) => (StatusCode::NOT_FOUND, "plan_not_found"),
            AppError::InvalidRequestState => (StatusCode::CONFLICT, "invalid_request_state"),
            AppError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "file_too_large"),
            AppError::InvalidPath => (StatusCode::BAD_REQUEST, "invalid_path"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let codes: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(codes));
                }
                Some(Value::Object(details))
            }
            AppError::Forbidden(permission) => Some(json!({ "permission": permission })),
            AppError::LimitExceeded { resource, limit } => {
                Some(json!({ "resource": resource, "limit": limit }))
            }
            AppError::StorageQuotaExceeded { used_mb, limit_mb } => {
                Some(json!({ "usedMb": used_mb, "limitMb": limit_mb }))
            }
            AppError::RecordNotFound(kind) => Some(json!({ "kind": kind })),
            AppError::PlanNotFound(plan_id) => Some(json!({ "planId": plan_id })),
            AppError::FileTooLarge { max_mb } => Some(json!({ "maxMb": max_mb })),
            _ => None,
        }
    }

    /// Converte o erro em resposta HTTP traduzida para o idioma do cliente.
    /// Erros internos são logados e nunca vazam detalhes.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            error: store.translate(&locale.0, key).to_string(),
            details: self.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn limit_exceeded_maps_to_payment_required_with_details() {
        let store = I18nStore::new();
        let api = AppError::LimitExceeded { resource: "users", limit: 3 }.to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(api.details, Some(json!({ "resource": "users", "limit": 3 })));
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let store = I18nStore::new();
        let api = AppError::ExportError("genpdf exploded".into()).to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("genpdf"));
        assert!(api.details.is_none());
    }

    #[test]
    fn messages_follow_the_request_language() {
        let store = I18nStore::new();
        let tr = AppError::NegativeStock.to_api_error(&Locale("tr".into()), &store);
        let en = AppError::NegativeStock.to_api_error(&en(), &store);

        assert_ne!(tr.error, en.error);
        assert_eq!(tr.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
