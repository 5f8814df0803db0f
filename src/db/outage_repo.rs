// src/db/outage_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::outage::{CreateOutagePayload, OutageFilter, PowerOutage},
};

const OUTAGE_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, started_at, ended_at, duration_minutes, cause,
    affected_capacity_kw, lost_production_kwh, lost_revenue, description, created_by,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct OutageRepository {
    pool: PgPool,
}

impl OutageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateOutagePayload,
        duration_minutes: Option<i64>,
    ) -> Result<PowerOutage, AppError> {
        let outage = sqlx::query_as::<_, PowerOutage>(&format!(
            r#"
            INSERT INTO power_outages
                (company_id, site_id, plant_id, started_at, ended_at, duration_minutes, cause,
                 affected_capacity_kw, lost_production_kwh, lost_revenue, description, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {OUTAGE_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(payload.started_at)
        .bind(payload.ended_at)
        .bind(duration_minutes)
        .bind(&payload.cause)
        .bind(payload.affected_capacity_kw)
        .bind(payload.lost_production_kwh)
        .bind(payload.lost_revenue)
        .bind(payload.description.as_deref())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(outage)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<PowerOutage>, AppError> {
        let outage = sqlx::query_as::<_, PowerOutage>(&format!(
            "SELECT {OUTAGE_COLUMNS} FROM power_outages WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(outage)
    }

    pub async fn list(&self, company_id: Uuid, filter: &OutageFilter) -> Result<Vec<PowerOutage>, AppError> {
        let outages = sqlx::query_as::<_, PowerOutage>(&format!(
            r#"
            SELECT {OUTAGE_COLUMNS} FROM power_outages
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR site_id = $2)
              AND ($3::timestamptz IS NULL OR started_at >= $3)
              AND ($4::timestamptz IS NULL OR started_at <= $4)
              AND (NOT $5 OR ended_at IS NULL)
            ORDER BY started_at DESC
            "#
        ))
        .bind(company_id)
        .bind(filter.site_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.ongoing_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(outages)
    }

    pub async fn update(&self, outage: &PowerOutage) -> Result<PowerOutage, AppError> {
        let updated = sqlx::query_as::<_, PowerOutage>(&format!(
            r#"
            UPDATE power_outages SET
                started_at = $3, ended_at = $4, duration_minutes = $5, cause = $6,
                affected_capacity_kw = $7, lost_production_kwh = $8, lost_revenue = $9,
                description = $10, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {OUTAGE_COLUMNS}
            "#
        ))
        .bind(outage.company_id)
        .bind(outage.id)
        .bind(outage.started_at)
        .bind(outage.ended_at)
        .bind(outage.duration_minutes)
        .bind(&outage.cause)
        .bind(outage.affected_capacity_kw)
        .bind(outage.lost_production_kwh)
        .bind(outage.lost_revenue)
        .bind(outage.description.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("outage"))?;
        Ok(updated)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM power_outages WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
