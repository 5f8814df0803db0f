// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

const USER_COLUMNS: &str = r#"
    id, company_id, email, password_hash, full_name, phone, role,
    sites, plants, is_active, created_at, updated_at
"#;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

pub struct NewUser<'a> {
    pub company_id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: Role,
    pub sites: &'a [Uuid],
    pub plants: &'a [Uuid],
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário; e-mail duplicado vira `EmailAlreadyExists`.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (company_id, email, password_hash, full_name, phone, role, sites, plants)
            VALUES ($1, lower($2), $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_user.company_id)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .bind(new_user.phone)
        .bind(new_user.role)
        .bind(new_user.sites)
        .bind(new_user.plants)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE company_id = $1 ORDER BY full_name"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn update_assignments(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        sites: &[Uuid],
        plants: &[Uuid],
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET sites = $3, plants = $4, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(user_id)
        .bind(sites)
        .bind(plants)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn set_active(&self, company_id: Uuid, user_id: Uuid, active: bool) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_active = $3, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(user_id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
