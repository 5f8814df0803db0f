// src/db/maintenance_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::maintenance::{
        CreateMaintenancePayload, CreateWorkReportPayload, MaintenanceKind, MaintenanceRecord, WorkReport,
    },
};

const MAINTENANCE_COLUMNS: &str = r#"
    id, company_id, kind, site_id, plant_id, performed_at, performed_by, checks,
    general_status, notes, photos, created_by, created_at, updated_at
"#;

const WORK_REPORT_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, performed_at, performed_by, title, description,
    category, duration_hours, materials, photos, completed, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            r#"
            INSERT INTO maintenance_records
                (company_id, kind, site_id, plant_id, performed_at, performed_by, checks, general_status, notes, photos, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {MAINTENANCE_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.kind)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(payload.performed_at)
        .bind(&payload.performed_by)
        .bind(&payload.checks)
        .bind(payload.general_status)
        .bind(payload.notes.as_deref())
        .bind(&payload.photos)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM maintenance_records WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    // Mais recentes primeiro
    pub async fn list(
        &self,
        company_id: Uuid,
        kind: Option<MaintenanceKind>,
        plant_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            r#"
            SELECT {MAINTENANCE_COLUMNS} FROM maintenance_records
            WHERE company_id = $1
              AND ($2::maintenance_kind IS NULL OR kind = $2)
              AND ($3::uuid IS NULL OR plant_id = $3)
            ORDER BY performed_at DESC
            LIMIT $4
            "#
        ))
        .bind(company_id)
        .bind(kind)
        .bind(plant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn update(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord, AppError> {
        let updated = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            r#"
            UPDATE maintenance_records SET
                performed_at = $3, performed_by = $4, checks = $5, general_status = $6,
                notes = $7, photos = $8, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {MAINTENANCE_COLUMNS}
            "#
        ))
        .bind(record.company_id)
        .bind(record.id)
        .bind(record.performed_at)
        .bind(&record.performed_by)
        .bind(&record.checks)
        .bind(record.general_status)
        .bind(record.notes.as_deref())
        .bind(&record.photos)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("maintenance"))?;
        Ok(updated)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(&format!(
            "DELETE FROM maintenance_records WHERE company_id = $1 AND id = $2 RETURNING {MAINTENANCE_COLUMNS}"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

#[derive(Clone)]
pub struct WorkReportRepository {
    pool: PgPool,
}

impl WorkReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateWorkReportPayload,
    ) -> Result<WorkReport, AppError> {
        let report = sqlx::query_as::<_, WorkReport>(&format!(
            r#"
            INSERT INTO work_reports
                (company_id, site_id, plant_id, performed_at, performed_by, title, description,
                 category, duration_hours, materials, photos, completed, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {WORK_REPORT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(payload.performed_at)
        .bind(&payload.performed_by)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.category)
        .bind(payload.duration_hours)
        .bind(&payload.materials)
        .bind(&payload.photos)
        .bind(payload.completed)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<WorkReport>, AppError> {
        let report = sqlx::query_as::<_, WorkReport>(&format!(
            "SELECT {WORK_REPORT_COLUMNS} FROM work_reports WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn list(&self, company_id: Uuid) -> Result<Vec<WorkReport>, AppError> {
        let reports = sqlx::query_as::<_, WorkReport>(&format!(
            "SELECT {WORK_REPORT_COLUMNS} FROM work_reports WHERE company_id = $1 ORDER BY performed_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn update(&self, report: &WorkReport) -> Result<WorkReport, AppError> {
        let updated = sqlx::query_as::<_, WorkReport>(&format!(
            r#"
            UPDATE work_reports SET
                title = $3, description = $4, category = $5, duration_hours = $6,
                materials = $7, photos = $8, completed = $9, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {WORK_REPORT_COLUMNS}
            "#
        ))
        .bind(report.company_id)
        .bind(report.id)
        .bind(&report.title)
        .bind(&report.description)
        .bind(report.category)
        .bind(report.duration_hours)
        .bind(&report.materials)
        .bind(&report.photos)
        .bind(report.completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("work_report"))?;
        Ok(updated)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Option<WorkReport>, AppError> {
        let report = sqlx::query_as::<_, WorkReport>(&format!(
            "DELETE FROM work_reports WHERE company_id = $1 AND id = $2 RETURNING {WORK_REPORT_COLUMNS}"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(report)
    }
}
