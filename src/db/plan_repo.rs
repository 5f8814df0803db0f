// src/db/plan_repo.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;

pub const PLANS_CONFIG_KEY: &str = "saas_plans";

// Documento único `saas_config/saas_plans`
#[derive(Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch(&self) -> Result<Option<Value>, AppError> {
        let plans = sqlx::query_scalar::<_, Value>("SELECT plans FROM saas_config WHERE key = $1")
            .bind(PLANS_CONFIG_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plans)
    }

    pub async fn save(&self, plans: &Value, updated_by: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO saas_config (key, plans, updated_by, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (key) DO UPDATE
            SET plans = EXCLUDED.plans, updated_by = EXCLUDED.updated_by, updated_at = NOW()
            "#,
        )
        .bind(PLANS_CONFIG_KEY)
        .bind(plans)
        .bind(updated_by)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
