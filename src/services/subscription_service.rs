// src/services/subscription_service.rs

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::{error::AppError, format::round2},
    db::{company_repo::SubscriptionUpdate, CompanyRepository, StorageRepository},
    models::{
        company::{Company, LimitOverrides, SubscriptionStatus, UpdateCompanyPayload},
        plan::{
            LimitCheck, LimitedResource, Plan, SubscriptionInfo, SubscriptionState, UsageEntry, UsageSummary,
            UNLIMITED,
        },
        storage::DEFAULT_STORAGE_LIMIT_MB,
    },
    services::{
        plan_service::{PlanService, TRIAL_PLAN_ID},
        storage_service::ensure_tenant_key,
    },
};

const TRIAL_FALLBACK_DAYS: i64 = 14;
const UPGRADEABLE_PLANS: &[&str] = &[TRIAL_PLAN_ID, "starter"];

// =============================================================================
//  REGRAS PURAS
// =============================================================================

pub fn check_limit(limit: i64, used: i64) -> LimitCheck {
    if limit == UNLIMITED {
        return LimitCheck { allowed: true, limit, remaining: UNLIMITED };
    }
    LimitCheck {
        allowed: used < limit,
        limit,
        remaining: (limit - used).max(0),
    }
}

/// Override da empresa > limite do plano > 0.
pub fn effective_limit(company: &Company, plan: Option<&Plan>, resource: LimitedResource) -> i64 {
    company
        .overrides()
        .and_then(|o| o.get(resource))
        .or_else(|| plan.map(|p| p.limits.get(resource)))
        .unwrap_or(0)
}

/// Cota em MB: override > plano > 5120.
pub fn storage_limit_mb(company: &Company, plan: Option<&Plan>) -> i64 {
    company
        .overrides()
        .and_then(|o| o.storage_limit_mb)
        .or_else(|| plan.map(|p| p.limits.storage_limit_mb()))
        .unwrap_or(DEFAULT_STORAGE_LIMIT_MB)
}

pub fn effective_end_date(company: &Company) -> Option<DateTime<Utc>> {
    match company.subscription_status {
        SubscriptionStatus::Active => company.next_billing_date.or(company.subscription_end_date),
        SubscriptionStatus::Trial => company
            .trial_end_date
            .or_else(|| Some(company.created_at + Duration::days(TRIAL_FALLBACK_DAYS))),
        _ => None,
    }
}

/// Dias restantes contados por data (sem influência da hora).
pub fn remaining_days(end: Option<DateTime<Utc>>, today: NaiveDate) -> i64 {
    end.map(|end| (end.date_naive() - today).num_days().max(0)).unwrap_or(0)
}

pub fn subscription_info(company: &Company, plan: Option<&Plan>, today: NaiveDate) -> SubscriptionInfo {
    let end_date = effective_end_date(company);
    let days_remaining = remaining_days(end_date, today);

    let status = if days_remaining > 0 {
        if company.subscription_status == SubscriptionStatus::Trial {
            SubscriptionState::Trial
        } else {
            SubscriptionState::Active
        }
    } else {
        SubscriptionState::Expired
    };

    SubscriptionInfo {
        plan_id: company.subscription_plan.clone(),
        plan_name: plan
            .map(|p| if p.display_name.is_empty() { p.name.clone() } else { p.display_name.clone() })
            .unwrap_or_else(|| company.subscription_plan.clone()),
        status,
        days_remaining,
        monthly_price: plan.map(|p| p.price).unwrap_or(company.subscription_price),
        currency: plan.map(|p| p.currency.clone()).unwrap_or_else(|| "TRY".to_string()),
        end_date,
        can_upgrade: UPGRADEABLE_PLANS.contains(&company.subscription_plan.as_str()),
        is_expired: status == SubscriptionState::Expired,
        raw_status: company.subscription_status,
    }
}

pub fn usage_entry(current: f64, limit: f64) -> UsageEntry {
    let percentage = if limit < 0.0 {
        0.0
    } else if limit == 0.0 {
        if current > 0.0 { 100.0 } else { 0.0 }
    } else {
        round2((current / limit * 100.0).min(100.0))
    };
    UsageEntry { current, limit, percentage }
}

/// Campos gravados na empresa ao aplicar um plano.
pub fn subscription_update_for(plan: &Plan, now: DateTime<Utc>) -> SubscriptionUpdate {
    let is_trial = plan.id == TRIAL_PLAN_ID;
    let next_billing = now.checked_add_months(Months::new(1)).unwrap_or(now + Duration::days(30));
    let storage_limit_mb = plan.limits.storage_limit_mb();

    SubscriptionUpdate {
        plan_id: plan.id.clone(),
        status: if is_trial { SubscriptionStatus::Trial } else { SubscriptionStatus::Active },
        price: plan.price,
        start_date: now,
        end_date: next_billing,
        next_billing_date: next_billing,
        trial_end_date: if is_trial {
            Some(now + Duration::days(plan.duration_days.unwrap_or(TRIAL_FALLBACK_DAYS)))
        } else {
            None
        },
        limits: LimitOverrides {
            users: Some(plan.limits.users),
            sites: Some(plan.limits.sites),
            plants: Some(plan.limits.plants),
            storage: Some(if plan.limits.storage_gb < 0.0 {
                "unlimited".to_string()
            } else {
                format!("{:.2}GB", plan.limits.storage_gb)
            }),
            storage_limit_mb: Some(storage_limit_mb),
            fault_records: Some(plan.limits.fault_records),
            maintenance_records: Some(plan.limits.maintenance_records),
        },
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct SubscriptionService {
    company_repo: CompanyRepository,
    storage_repo: StorageRepository,
    plan_service: PlanService,
}

impl SubscriptionService {
    pub fn new(company_repo: CompanyRepository, storage_repo: StorageRepository, plan_service: PlanService) -> Self {
        Self { company_repo, storage_repo, plan_service }
    }

    pub async fn load_company(&self, company_id: Uuid) -> Result<Company, AppError> {
        self.company_repo
            .find_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        self.company_repo.list_all().await
    }

    pub async fn update_company(&self, company_id: Uuid, payload: &UpdateCompanyPayload) -> Result<Company, AppError> {
        if let Some(logo_key) = &payload.logo_key {
            ensure_tenant_key(company_id, logo_key)?;
        }
        self.company_repo
            .update_profile(company_id, payload)
            .await?
            .ok_or(AppError::CompanyNotFound)
    }

    pub async fn plan_for(&self, company: &Company) -> Result<Option<Plan>, AppError> {
        self.plan_service.resolve_plan(&company.subscription_plan).await
    }

    pub async fn check_usage(&self, company_id: Uuid, resource: LimitedResource) -> Result<LimitCheck, AppError> {
        let company = self.load_company(company_id).await?;
        let plan = self.plan_for(&company).await?;
        let limit = effective_limit(&company, plan.as_ref(), resource);
        let used = self.company_repo.count_resource(company_id, resource).await?;
        Ok(check_limit(limit, used))
    }

    /// Falha com `LimitExceeded` se não houver espaço para mais um registro.
    pub async fn enforce_limit(&self, company_id: Uuid, resource: LimitedResource) -> Result<(), AppError> {
        let check = self.check_usage(company_id, resource).await?;
        if !check.allowed {
            tracing::info!("⛔ Limite de {} atingido para a empresa {}", resource.as_str(), company_id);
            return Err(AppError::LimitExceeded { resource: resource.as_str(), limit: check.limit });
        }
        Ok(())
    }

    pub async fn storage_limit_mb(&self, company_id: Uuid) -> Result<i64, AppError> {
        let company = self.load_company(company_id).await?;
        let plan = self.plan_for(&company).await?;
        Ok(storage_limit_mb(&company, plan.as_ref()))
    }

    pub async fn subscription_info(&self, company_id: Uuid) -> Result<SubscriptionInfo, AppError> {
        let company = self.load_company(company_id).await?;
        let plan = self.plan_for(&company).await?;
        Ok(subscription_info(&company, plan.as_ref(), Utc::now().date_naive()))
    }

    pub async fn has_feature(&self, company_id: Uuid, feature: &str) -> Result<bool, AppError> {
        let company = self.load_company(company_id).await?;
        Ok(self.plan_for(&company).await?.is_some_and(|p| p.has_feature(feature)))
    }

    pub async fn usage_summary(&self, company_id: Uuid) -> Result<UsageSummary, AppError> {
        let company = self.load_company(company_id).await?;
        let plan = self.plan_for(&company).await?;
        let plan = plan.as_ref();

        let users = self.usage_for(&company, plan, LimitedResource::Users).await?;
        let sites = self.usage_for(&company, plan, LimitedResource::Sites).await?;
        let plants = self.usage_for(&company, plan, LimitedResource::Plants).await?;
        let fault_records = self.usage_for(&company, plan, LimitedResource::FaultRecords).await?;
        let maintenance_records = self.usage_for(&company, plan, LimitedResource::MaintenanceRecords).await?;

        let used_bytes = self
            .storage_repo
            .find(company_id)
            .await?
            .map(|row| row.storage_used_bytes)
            .unwrap_or(0);
        let limit_mb = storage_limit_mb(&company, plan);
        let used_gb = round2(used_bytes as f64 / (1024.0 * 1024.0 * 1024.0));
        let limit_gb = if limit_mb == UNLIMITED { -1.0 } else { round2(limit_mb as f64 / 1024.0) };

        Ok(UsageSummary {
            users,
            sites,
            plants,
            storage_gb: usage_entry(used_gb, limit_gb),
            fault_records,
            maintenance_records,
        })
    }

    async fn usage_for(
        &self,
        company: &Company,
        plan: Option<&Plan>,
        resource: LimitedResource,
    ) -> Result<UsageEntry, AppError> {
        let used = self.company_repo.count_resource(company.id, resource).await?;
        Ok(usage_entry(used as f64, effective_limit(company, plan, resource) as f64))
    }

    /// Aplica o plano na empresa (ação de superadmin, aprovação ou pagamento).
    pub async fn apply_plan(&self, company_id: Uuid, plan_id: &str, actor: Uuid) -> Result<Company, AppError> {
        let plan = self
            .plan_service
            .resolve_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::PlanNotFound(plan_id.to_string()))?;

        let update = subscription_update_for(&plan, Utc::now());
        let company = self
            .company_repo
            .apply_subscription(company_id, &update)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        tracing::info!("💳 Plano '{}' aplicado à empresa {} por {}", plan.id, company_id, actor);
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::plan_service::trial_plan;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn company(status: SubscriptionStatus) -> Company {
        Company {
            id: Uuid::new_v4(),
            name: "Güneş Enerji".into(),
            email: None,
            phone: None,
            address: None,
            logo_key: None,
            subscription_plan: "trial".into(),
            subscription_status: status,
            subscription_price: Decimal::ZERO,
            subscription_start_date: None,
            subscription_end_date: None,
            next_billing_date: None,
            trial_end_date: None,
            subscription_limits: None,
            is_active: true,
            created_at: "2024-01-01T09:00:00Z".parse().unwrap(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn limits_allow_until_reached() {
        assert_eq!(check_limit(3, 2), LimitCheck { allowed: true, limit: 3, remaining: 1 });
        assert_eq!(check_limit(3, 3), LimitCheck { allowed: false, limit: 3, remaining: 0 });
        assert_eq!(check_limit(3, 7), LimitCheck { allowed: false, limit: 3, remaining: 0 });
        assert_eq!(check_limit(0, 0), LimitCheck { allowed: false, limit: 0, remaining: 0 });
    }

    #[test]
    fn unlimited_always_allows() {
        assert_eq!(check_limit(-1, 1_000_000), LimitCheck { allowed: true, limit: -1, remaining: -1 });
    }

    #[test]
    fn company_override_beats_plan_limit() {
        let mut c = company(SubscriptionStatus::Trial);
        let plan = trial_plan();
        assert_eq!(effective_limit(&c, Some(&plan), LimitedResource::Users), 3);
        assert_eq!(effective_limit(&c, None, LimitedResource::Users), 0);

        c.subscription_limits = Some(Json(LimitOverrides { users: Some(-1), ..Default::default() }));
        assert_eq!(effective_limit(&c, Some(&plan), LimitedResource::Users), -1);
        assert_eq!(effective_limit(&c, Some(&plan), LimitedResource::Sites), 2);
    }

    #[test]
    fn storage_limit_defaults_to_5120() {
        let mut c = company(SubscriptionStatus::Trial);
        assert_eq!(storage_limit_mb(&c, None), 5120);
        assert_eq!(storage_limit_mb(&c, Some(&trial_plan())), 1024);

        c.subscription_limits = Some(Json(LimitOverrides { storage_limit_mb: Some(3072), ..Default::default() }));
        assert_eq!(storage_limit_mb(&c, Some(&trial_plan())), 3072);
    }

    #[test]
    fn trial_without_end_date_falls_back_to_creation_plus_14_days() {
        let c = company(SubscriptionStatus::Trial);
        let end = effective_end_date(&c).unwrap();
        assert_eq!(end.date_naive(), date(2024, 1, 15));
    }

    #[test]
    fn active_prefers_next_billing_date() {
        let mut c = company(SubscriptionStatus::Active);
        c.subscription_end_date = Some("2024-03-01T00:00:00Z".parse().unwrap());
        assert_eq!(effective_end_date(&c).unwrap().date_naive(), date(2024, 3, 1));

        c.next_billing_date = Some("2024-02-10T00:00:00Z".parse().unwrap());
        assert_eq!(effective_end_date(&c).unwrap().date_naive(), date(2024, 2, 10));

        assert_eq!(effective_end_date(&company(SubscriptionStatus::Cancelled)), None);
    }

    #[test]
    fn remaining_days_ignore_time_of_day() {
        let end: DateTime<Utc> = "2024-01-10T23:59:00Z".parse().unwrap();
        assert_eq!(remaining_days(Some(end), date(2024, 1, 9)), 1);
        assert_eq!(remaining_days(Some(end), date(2024, 1, 10)), 0);
        assert_eq!(remaining_days(Some(end), date(2024, 2, 1)), 0);
        assert_eq!(remaining_days(None, date(2024, 1, 1)), 0);
    }

    #[test]
    fn info_reports_expired_when_no_days_remain() {
        let mut c = company(SubscriptionStatus::Trial);
        c.trial_end_date = Some("2024-01-20T12:00:00Z".parse().unwrap());

        let live = subscription_info(&c, Some(&trial_plan()), date(2024, 1, 18));
        assert_eq!(live.status, SubscriptionState::Trial);
        assert_eq!(live.days_remaining, 2);
        assert!(live.can_upgrade);

        let expired = subscription_info(&c, Some(&trial_plan()), date(2024, 1, 20));
        assert_eq!(expired.status, SubscriptionState::Expired);
        assert!(expired.is_expired);
    }

    #[test]
    fn applying_a_paid_plan_clears_trial_and_copies_limits() {
        let mut plan = trial_plan();
        plan.id = "professional".into();
        plan.price = Decimal::from(999);
        plan.limits.storage_gb = 10.0;
        let now: DateTime<Utc> = "2024-01-31T10:00:00Z".parse().unwrap();

        let update = subscription_update_for(&plan, now);

        assert_eq!(update.status, SubscriptionStatus::Active);
        assert_eq!(update.trial_end_date, None);
        assert_eq!(update.next_billing_date.date_naive(), date(2024, 2, 29));
        assert_eq!(update.limits.storage_limit_mb, Some(10240));
        assert_eq!(update.limits.storage.as_deref(), Some("10.00GB"));
        assert_eq!(update.limits.sites, Some(plan.limits.sites));
    }

    #[test]
    fn applying_trial_keeps_trial_status() {
        let now = Utc::now();
        let update = subscription_update_for(&trial_plan(), now);
        assert_eq!(update.status, SubscriptionStatus::Trial);
        assert_eq!(update.trial_end_date, Some(now + Duration::days(14)));
    }

    #[test]
    fn usage_percentages() {
        assert_eq!(usage_entry(1.0, 4.0).percentage, 25.0);
        assert_eq!(usage_entry(9.0, 4.0).percentage, 100.0);
        assert_eq!(usage_entry(9.0, -1.0).percentage, 0.0);
        assert_eq!(usage_entry(1.0, 0.0).percentage, 100.0);
    }
}
