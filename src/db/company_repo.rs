// src/db/company_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        company::{Company, LimitOverrides, SubscriptionStatus, UpdateCompanyPayload},
        plan::LimitedResource,
    },
};

const COMPANY_COLUMNS: &str = r#"
    id, name, email, phone, address, logo_key,
    subscription_plan, subscription_status, subscription_price,
    subscription_start_date, subscription_end_date, next_billing_date, trial_end_date,
    subscription_limits, is_active, created_at, updated_at
"#;

/// Novos valores de assinatura gravados ao aplicar um plano.
pub struct SubscriptionUpdate {
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub price: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub next_billing_date: DateTime<Utc>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub limits: LimitOverrides,
}

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        phone: Option<&str>,
        trial_end_date: DateTime<Utc>,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (name, email, phone, subscription_plan, subscription_status, trial_end_date)
            VALUES ($1, $2, $3, 'trial', 'trial', $4)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(trial_end_date)
        .fetch_one(executor)
        .await?;
        Ok(company)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn list_active_ids(&self) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM companies WHERE is_active ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn update_profile(&self, id: Uuid, payload: &UpdateCompanyPayload) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                logo_key = COALESCE($6, logo_key),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.logo_key.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    pub async fn apply_subscription(&self, id: Uuid, update: &SubscriptionUpdate) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies SET
                subscription_plan = $2,
                subscription_status = $3,
                subscription_price = $4,
                subscription_start_date = $5,
                subscription_end_date = $6,
                next_billing_date = $7,
                trial_end_date = $8,
                subscription_limits = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.plan_id)
        .bind(update.status)
        .bind(update.price)
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.next_billing_date)
        .bind(update.trial_end_date)
        .bind(Json(&update.limits))
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    /// Quantidade atual de um recurso limitado.
    pub async fn count_resource(&self, company_id: Uuid, resource: LimitedResource) -> Result<i64, AppError> {
        let sql = match resource {
            LimitedResource::Users => "SELECT COUNT(*) FROM users WHERE company_id = $1 AND is_active",
            LimitedResource::Sites => "SELECT COUNT(*) FROM sites WHERE company_id = $1",
            LimitedResource::Plants => "SELECT COUNT(*) FROM power_plants WHERE company_id = $1",
            LimitedResource::FaultRecords => "SELECT COUNT(*) FROM faults WHERE company_id = $1",
            LimitedResource::MaintenanceRecords => "SELECT COUNT(*) FROM maintenance_records WHERE company_id = $1",
            // Sem medição de chamadas de API
            LimitedResource::MonthlyApiCalls => return Ok(0),
        };
        let count = sqlx::query_scalar::<_, i64>(sql)
            .bind(company_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
