// src/db/upgrade_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::upgrade::{RequestStatus, UpgradeRequest},
};

const REQUEST_COLUMNS: &str = r#"
    id, company_id, company_name, requested_plan_id, current_plan_id, requested_by, note,
    status, decided_by, decided_at, reject_reason, created_at
"#;

pub const MAX_LISTED_REQUESTS: i64 = 100;

#[derive(Clone)]
pub struct UpgradeRepository {
    pool: PgPool,
}

impl UpgradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        company_name: &str,
        requested_plan_id: &str,
        current_plan_id: &str,
        requested_by: Uuid,
        note: Option<&str>,
    ) -> Result<UpgradeRequest, AppError> {
        let request = sqlx::query_as::<_, UpgradeRequest>(&format!(
            r#"
            INSERT INTO upgrade_requests (company_id, company_name, requested_plan_id, current_plan_id, requested_by, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(company_name)
        .bind(requested_plan_id)
        .bind(current_plan_id)
        .bind(requested_by)
        .bind(note)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<UpgradeRequest>, AppError> {
        let request = sqlx::query_as::<_, UpgradeRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM upgrade_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    // Mais recentes primeiro, no máximo 100
    pub async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<UpgradeRequest>, AppError> {
        let requests = sqlx::query_as::<_, UpgradeRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS} FROM upgrade_requests
            WHERE ($1::request_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(status)
        .bind(MAX_LISTED_REQUESTS)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<UpgradeRequest>, AppError> {
        let requests = sqlx::query_as::<_, UpgradeRequest>(&format!(
            r#"
            SELECT {REQUEST_COLUMNS} FROM upgrade_requests
            WHERE company_id = $1 ORDER BY created_at DESC LIMIT $2
            "#
        ))
        .bind(company_id)
        .bind(MAX_LISTED_REQUESTS)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Só decide solicitações pendentes; devolve `None` se já decidida.
    pub async fn decide(
        &self,
        id: Uuid,
        status: RequestStatus,
        decided_by: Uuid,
        reject_reason: Option<&str>,
    ) -> Result<Option<UpgradeRequest>, AppError> {
        let request = sqlx::query_as::<_, UpgradeRequest>(&format!(
            r#"
            UPDATE upgrade_requests
            SET status = $2, decided_by = $3, decided_at = NOW(), reject_reason = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(decided_by)
        .bind(reject_reason)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }
}
