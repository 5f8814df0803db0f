// src/db/shift_repo.rs

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::shift::{CreateShiftPayload, ShiftFilter, ShiftReport},
};

const SHIFT_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, shift_date, shift_type, starts_at, ends_at, personnel,
    condition, emergency, observations, tasks_done, photos, location, weather, security_checks,
    equipment_checks, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateShiftPayload,
        emergency: bool,
    ) -> Result<ShiftReport, AppError> {
        let report = sqlx::query_as::<_, ShiftReport>(&format!(
            r#"
            INSERT INTO shift_reports
                (company_id, site_id, plant_id, shift_date, shift_type, starts_at, ends_at, personnel,
                 condition, emergency, observations, tasks_done, photos, location, weather,
                 security_checks, equipment_checks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {SHIFT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(payload.shift_date)
        .bind(payload.shift_type)
        .bind(payload.starts_at)
        .bind(payload.ends_at)
        .bind(Json(&payload.personnel))
        .bind(payload.condition)
        .bind(emergency)
        .bind(Json(&payload.observations))
        .bind(&payload.tasks_done)
        .bind(&payload.photos)
        .bind(payload.location.as_ref().map(Json))
        .bind(payload.weather.as_ref().map(Json))
        .bind(payload.security_checks.as_ref().map(Json))
        .bind(payload.equipment_checks.as_ref().map(Json))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<ShiftReport>, AppError> {
        let report = sqlx::query_as::<_, ShiftReport>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shift_reports WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    /// Mais recentes primeiro.
    pub async fn list(&self, company_id: Uuid, filter: &ShiftFilter) -> Result<Vec<ShiftReport>, AppError> {
        let reports = sqlx::query_as::<_, ShiftReport>(&format!(
            r#"
            SELECT {SHIFT_COLUMNS} FROM shift_reports
            WHERE company_id = $1
              AND ($2::uuid IS NULL OR site_id = $2)
              AND ($3::uuid IS NULL OR created_by = $3)
              AND ($4::timestamptz IS NULL OR shift_date >= $4)
              AND ($5::timestamptz IS NULL OR shift_date < $5)
              AND (NOT $6 OR emergency)
            ORDER BY shift_date DESC, created_at DESC
            "#
        ))
        .bind(company_id)
        .bind(filter.site_id)
        .bind(filter.created_by)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.urgent_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn update(&self, report: &ShiftReport) -> Result<ShiftReport, AppError> {
        let updated = sqlx::query_as::<_, ShiftReport>(&format!(
            r#"
            UPDATE shift_reports SET
                shift_type = $3, starts_at = $4, ends_at = $5, personnel = $6, condition = $7,
                emergency = $8, observations = $9, tasks_done = $10, photos = $11, location = $12,
                weather = $13, security_checks = $14, equipment_checks = $15, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {SHIFT_COLUMNS}
            "#
        ))
        .bind(report.company_id)
        .bind(report.id)
        .bind(report.shift_type)
        .bind(report.starts_at)
        .bind(report.ends_at)
        .bind(&report.personnel)
        .bind(report.condition)
        .bind(report.emergency)
        .bind(&report.observations)
        .bind(&report.tasks_done)
        .bind(&report.photos)
        .bind(&report.location)
        .bind(&report.weather)
        .bind(&report.security_checks)
        .bind(&report.equipment_checks)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("shift_report"))?;
        Ok(updated)
    }

    /// Devolve o registro removido para limpar as fotos.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Option<ShiftReport>, AppError> {
        let report = sqlx::query_as::<_, ShiftReport>(&format!(
            "DELETE FROM shift_reports WHERE company_id = $1 AND id = $2 RETURNING {SHIFT_COLUMNS}"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }
}
