// src/db/storage_repo.rs

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::storage::{StorageMetricsRow, StorageUsage, UsageDelta},
};

const METRICS_COLUMNS: &str = "company_id, storage_used_bytes, file_count, breakdown, is_recount, last_calculated";

#[derive(Clone)]
pub struct StorageRepository {
    pool: PgPool,
}

impl StorageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, company_id: Uuid) -> Result<Option<StorageMetricsRow>, AppError> {
        let row = sqlx::query_as::<_, StorageMetricsRow>(&format!(
            "SELECT {METRICS_COLUMNS} FROM company_storage_metrics WHERE company_id = $1"
        ))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Incremento atômico dos contadores (caminho incremental).
    pub async fn apply_delta(&self, company_id: Uuid, delta: &UsageDelta) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO company_storage_metrics (company_id, storage_used_bytes, file_count, breakdown, is_recount, last_calculated)
            VALUES ($1, GREATEST($2, 0), GREATEST($3, 0), jsonb_build_object($4::text, GREATEST($2, 0)), FALSE, NOW())
            ON CONFLICT (company_id) DO UPDATE SET
                storage_used_bytes = company_storage_metrics.storage_used_bytes + $2,
                file_count = company_storage_metrics.file_count + $3,
                breakdown = jsonb_set(
                    company_storage_metrics.breakdown,
                    ARRAY[$4::text],
                    to_jsonb(COALESCE((company_storage_metrics.breakdown ->> $4::text)::bigint, 0) + $2)
                ),
                is_recount = FALSE,
                last_calculated = NOW()
            "#,
        )
        .bind(company_id)
        .bind(delta.bytes)
        .bind(delta.files)
        .bind(delta.category.key())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Sobrescreve os contadores com o resultado de uma recontagem.
    pub async fn overwrite(&self, company_id: Uuid, usage: &StorageUsage) -> Result<StorageMetricsRow, AppError> {
        let row = sqlx::query_as::<_, StorageMetricsRow>(&format!(
            r#"
            INSERT INTO company_storage_metrics (company_id, storage_used_bytes, file_count, breakdown, is_recount, last_calculated)
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            ON CONFLICT (company_id) DO UPDATE SET
                storage_used_bytes = EXCLUDED.storage_used_bytes,
                file_count = EXCLUDED.file_count,
                breakdown = EXCLUDED.breakdown,
                is_recount = TRUE,
                last_calculated = NOW()
            RETURNING {METRICS_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(usage.used_bytes)
        .bind(usage.file_count)
        .bind(Json(&usage.breakdown))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
