// src/db/site_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::site::{PowerPlant, Site},
};

#[derive(Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SAHALAR
    // =========================================================================

    pub async fn create_site(&self, company_id: Uuid, name: &str, address: Option<&str>) -> Result<Site, AppError> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO sites (company_id, name, address)
            VALUES ($1, $2, $3)
            RETURNING id, company_id, name, address, created_at
            "#,
        )
        .bind(company_id)
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;
        Ok(site)
    }

    pub async fn list_sites(&self, company_id: Uuid) -> Result<Vec<Site>, AppError> {
        let sites = sqlx::query_as::<_, Site>(
            "SELECT id, company_id, name, address, created_at FROM sites WHERE company_id = $1 ORDER BY name",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sites)
    }

    pub async fn find_site(&self, company_id: Uuid, id: Uuid) -> Result<Option<Site>, AppError> {
        let site = sqlx::query_as::<_, Site>(
            "SELECT id, company_id, name, address, created_at FROM sites WHERE company_id = $1 AND id = $2",
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(site)
    }

    pub async fn delete_site(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sites WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  SANTRALLER
    // =========================================================================

    pub async fn create_plant(
        &self,
        company_id: Uuid,
        site_id: Uuid,
        name: &str,
        capacity_kw: Decimal,
    ) -> Result<PowerPlant, AppError> {
        let plant = sqlx::query_as::<_, PowerPlant>(
            r#"
            INSERT INTO power_plants (company_id, site_id, name, capacity_kw)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, site_id, name, capacity_kw, created_at
            "#,
        )
        .bind(company_id)
        .bind(site_id)
        .bind(name)
        .bind(capacity_kw)
        .fetch_one(&self.pool)
        .await?;
        Ok(plant)
    }

    pub async fn list_plants(&self, company_id: Uuid) -> Result<Vec<PowerPlant>, AppError> {
        let plants = sqlx::query_as::<_, PowerPlant>(
            r#"
            SELECT id, company_id, site_id, name, capacity_kw, created_at
            FROM power_plants WHERE company_id = $1 ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(plants)
    }

    pub async fn delete_plant(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM power_plants WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
