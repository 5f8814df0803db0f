// src/db/asset_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::asset::{AssetFilter, AssetStatus, CreateAssetPayload, InventoryAsset},
};

const ASSET_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, category, brand, model, serial_number, quantity, status,
    installed_at, warranty_start, warranty_months, warranty_end, warranty_scope, supplier,
    invoice_no, location, notes, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateAssetPayload,
        warranty_end: Option<chrono::NaiveDate>,
    ) -> Result<InventoryAsset, AppError> {
        let asset = sqlx::query_as::<_, InventoryAsset>(&format!(
            r#"
            INSERT INTO inventory_assets
                (company_id, site_id, plant_id, category, brand, model, serial_number, quantity, status,
                 installed_at, warranty_start, warranty_months, warranty_end, warranty_scope, supplier,
                 invoice_no, location, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(payload.category)
        .bind(payload.brand.as_deref())
        .bind(payload.model.as_deref())
        .bind(payload.serial_number.as_deref())
        .bind(payload.quantity.unwrap_or(1))
        .bind(payload.status.unwrap_or(AssetStatus::Active))
        .bind(payload.installed_at)
        .bind(payload.warranty_start)
        .bind(payload.warranty_months)
        .bind(warranty_end)
        .bind(payload.warranty_scope.as_deref())
        .bind(payload.supplier.as_deref())
        .bind(payload.invoice_no.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.notes.as_deref())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(asset)
    }

    pub async fn find(&self, company_id: Uuid, id: Uuid) -> Result<Option<InventoryAsset>, AppError> {
        let asset = sqlx::query_as::<_, InventoryAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM inventory_assets WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(asset)
    }

    /// Página por cursor (`created_at` anterior ao `before`). Busca `limit` linhas.
    pub async fn list(&self, company_id: Uuid, filter: &AssetFilter, limit: i64) -> Result<Vec<InventoryAsset>, AppError> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let assets = sqlx::query_as::<_, InventoryAsset>(&format!(
            r#"
            SELECT {ASSET_COLUMNS} FROM inventory_assets
            WHERE company_id = $1
              AND ($2::asset_category IS NULL OR category = $2)
              AND ($3::uuid IS NULL OR site_id = $3)
              AND ($4::uuid IS NULL OR plant_id = $4)
              AND ($5::timestamptz IS NULL OR created_at < $5)
              AND ($6::text IS NULL
                   OR brand ILIKE '%' || $6 || '%'
                   OR model ILIKE '%' || $6 || '%'
                   OR serial_number ILIKE '%' || $6 || '%')
            ORDER BY created_at DESC
            LIMIT $7
            "#
        ))
        .bind(company_id)
        .bind(filter.category)
        .bind(filter.site_id)
        .bind(filter.plant_id)
        .bind(filter.before)
        .bind(search)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(assets)
    }

    pub async fn update(&self, asset: &InventoryAsset) -> Result<InventoryAsset, AppError> {
        let updated = sqlx::query_as::<_, InventoryAsset>(&format!(
            r#"
            UPDATE inventory_assets SET
                plant_id = $3, category = $4, brand = $5, model = $6, serial_number = $7,
                quantity = $8, status = $9, installed_at = $10, warranty_start = $11,
                warranty_months = $12, warranty_end = $13, warranty_scope = $14, supplier = $15,
                invoice_no = $16, location = $17, notes = $18, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(asset.company_id)
        .bind(asset.id)
        .bind(asset.plant_id)
        .bind(asset.category)
        .bind(asset.brand.as_deref())
        .bind(asset.model.as_deref())
        .bind(asset.serial_number.as_deref())
        .bind(asset.quantity)
        .bind(asset.status)
        .bind(asset.installed_at)
        .bind(asset.warranty_start)
        .bind(asset.warranty_months)
        .bind(asset.warranty_end)
        .bind(asset.warranty_scope.as_deref())
        .bind(asset.supplier.as_deref())
        .bind(asset.invoice_no.as_deref())
        .bind(asset.location.as_deref())
        .bind(asset.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("asset"))?;
        Ok(updated)
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory_assets WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
