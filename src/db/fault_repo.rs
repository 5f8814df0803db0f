// src/db/fault_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::fault::{CreateFaultPayload, Fault, FaultFilter, FaultPriority},
};

const FAULT_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, title, description, status, priority, photos,
    reported_by, assigned_to, resolution, resolved_at, created_at, updated_at
"#;

#[derive(Clone)]
pub struct FaultRepository {
    pool: PgPool,
}

impl FaultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company_id: Uuid, reported_by: Uuid, payload: &CreateFaultPayload) -> Result<Fault, AppError> {
        let fault = sqlx::query_as::<_, Fault>(&format!(
            r#"
            INSERT INTO faults (company_id, site_id, plant_id, title, description, priority, photos, reported_by, assigned_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FAULT_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.priority.unwrap_or(FaultPriority::Normal))
        .bind(&payload.photos)
        .bind(reported_by)
        .bind(payload.assigned_to)
        .fetch_one(&self.pool)
        .await?;
        Ok(fault)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<Fault>, AppError> {
        let fault = sqlx::query_as::<_, Fault>(&format!(
            "SELECT {FAULT_COLUMNS} FROM faults WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fault)
    }

    /// Filtros opcionais; `search` compara título e descrição sem diferenciar maiúsculas.
    pub async fn list(&self, company_id: Uuid, filter: &FaultFilter) -> Result<Vec<Fault>, AppError> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let faults = sqlx::query_as::<_, Fault>(&format!(
            r#"
            SELECT {FAULT_COLUMNS} FROM faults
            WHERE company_id = $1
              AND ($2::fault_status IS NULL OR status = $2)
              AND ($3::fault_priority IS NULL OR priority = $3)
              AND ($4::uuid IS NULL OR site_id = $4)
              AND ($5::text IS NULL OR title ILIKE '%' || $5 || '%' OR description ILIKE '%' || $5 || '%')
            ORDER BY created_at DESC
            "#
        ))
        .bind(company_id)
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.site_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(faults)
    }

    pub async fn update(&self, fault: &Fault) -> Result<Fault, AppError> {
        let updated = sqlx::query_as::<_, Fault>(&format!(
            r#"
            UPDATE faults SET
                title = $3, description = $4, status = $5, priority = $6, photos = $7,
                assigned_to = $8, resolution = $9, resolved_at = $10, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {FAULT_COLUMNS}
            "#
        ))
        .bind(fault.company_id)
        .bind(fault.id)
        .bind(&fault.title)
        .bind(&fault.description)
        .bind(fault.status)
        .bind(fault.priority)
        .bind(&fault.photos)
        .bind(fault.assigned_to)
        .bind(fault.resolution.as_deref())
        .bind(fault.resolved_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("fault"))?;
        Ok(updated)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<Option<Fault>, AppError> {
        let fault = sqlx::query_as::<_, Fault>(&format!(
            "DELETE FROM faults WHERE company_id = $1 AND id = $2 RETURNING {FAULT_COLUMNS}"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(fault)
    }
}
