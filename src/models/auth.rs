// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papéis do sistema. Os nomes no fio/banco são os nomes turcos legados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[serde(rename = "superadmin")]
    #[sqlx(rename = "superadmin")]
    SuperAdmin,
    #[serde(rename = "yonetici")]
    #[sqlx(rename = "yonetici")]
    Manager,
    #[serde(rename = "muhendis")]
    #[sqlx(rename = "muhendis")]
    Engineer,
    #[serde(rename = "tekniker")]
    #[sqlx(rename = "tekniker")]
    Technician,
    #[serde(rename = "bekci")]
    #[sqlx(rename = "bekci")]
    Guard,
    #[serde(rename = "musteri")]
    #[sqlx(rename = "musteri")]
    Customer,
}

impl Role {
    /// Papéis que só enxergam registros das sahalar/santraller atribuídas.
    pub fn is_restricted(self) -> bool {
        matches!(self, Role::Customer | Role::Technician | Role::Engineer | Role::Guard)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "ali@gunes-enerji.com.tr")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Ali Yılmaz")]
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub sites: Vec<Uuid>,
    pub plants: Vec<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de uma nova empresa + gestor
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ali Yılmaz")]
    pub full_name: String,
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Güneş Enerji A.Ş.")]
    pub company_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,
    pub company_id: Uuid,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

// --- Equipe ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,
    #[validate(length(min = 1, message = "required"))]
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub sites: Vec<Uuid>,
    #[serde(default)]
    pub plants: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAssignmentsPayload {
    pub sites: Vec<Uuid>,
    pub plants: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_legacy_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"yonetici\"");
        let role: Role = serde_json::from_str("\"bekci\"").unwrap();
        assert_eq!(role, Role::Guard);
    }

    #[test]
    fn only_field_roles_are_restricted() {
        assert!(!Role::SuperAdmin.is_restricted());
        assert!(!Role::Manager.is_restricted());
        for role in [Role::Engineer, Role::Technician, Role::Guard, Role::Customer] {
            assert!(role.is_restricted());
        }
    }
}
