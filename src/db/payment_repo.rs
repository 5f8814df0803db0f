// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{PaymentSession, PaymentStatus},
};

const SESSION_COLUMNS: &str = r#"
    id, company_id, plan_id, amount, currency, token, status, created_by, created_at, completed_at
"#;

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        plan_id: &str,
        amount: Decimal,
        currency: &str,
        token: &str,
        created_by: Uuid,
    ) -> Result<PaymentSession, AppError> {
        let session = sqlx::query_as::<_, PaymentSession>(&format!(
            r#"
            INSERT INTO payment_sessions (company_id, plan_id, amount, currency, token, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(plan_id)
        .bind(amount)
        .bind(currency)
        .bind(token)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn find_by_token(&self, company_id: Uuid, token: &str) -> Result<Option<PaymentSession>, AppError> {
        let session = sqlx::query_as::<_, PaymentSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM payment_sessions WHERE company_id = $1 AND token = $2"
        ))
        .bind(company_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn complete(&self, id: Uuid, status: PaymentStatus) -> Result<Option<PaymentSession>, AppError> {
        let session = sqlx::query_as::<_, PaymentSession>(&format!(
            r#"
            UPDATE payment_sessions SET status = $2, completed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }
}
