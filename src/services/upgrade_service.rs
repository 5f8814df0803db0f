// src/services/upgrade_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UpgradeRepository,
    models::{
        auth::User,
        upgrade::{CreateUpgradeRequestPayload, RequestStatus, UpgradeRequest},
    },
    services::{plan_service::PlanService, subscription_service::SubscriptionService},
};

fn ensure_pending(request: &UpgradeRequest) -> Result<(), AppError> {
    if request.status != RequestStatus::Pending {
        return Err(AppError::InvalidRequestState);
    }
    Ok(())
}

#[derive(Clone)]
pub struct UpgradeService {
    repo: UpgradeRepository,
    plan_service: PlanService,
    subscription: SubscriptionService,
}

impl UpgradeService {
    pub fn new(repo: UpgradeRepository, plan_service: PlanService, subscription: SubscriptionService) -> Self {
        Self { repo, plan_service, subscription }
    }

    pub async fn create(
        &self,
        user: &User,
        company_id: Uuid,
        payload: &CreateUpgradeRequestPayload,
    ) -> Result<UpgradeRequest, AppError> {
        let plan = self
            .plan_service
            .resolve_plan(&payload.plan_id)
            .await?
            .ok_or_else(|| AppError::PlanNotFound(payload.plan_id.clone()))?;
        let company = self.subscription.load_company(company_id).await?;

        let request = self
            .repo
            .create(
                company_id,
                &company.name,
                &plan.id,
                &company.subscription_plan,
                user.id,
                payload.note.as_deref(),
            )
            .await?;

        tracing::info!("📨 Pedido de upgrade '{}' → '{}' ({})", company.subscription_plan, plan.id, company.name);
        Ok(request)
    }

    pub async fn list(&self, status: Option<RequestStatus>) -> Result<Vec<UpgradeRequest>, AppError> {
        self.repo.list(status).await
    }

    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<UpgradeRequest>, AppError> {
        self.repo.list_for_company(company_id).await
    }

    async fn pending(&self, id: Uuid) -> Result<UpgradeRequest, AppError> {
        let request = self.repo.find(id).await?.ok_or(AppError::RecordNotFound("upgrade_request"))?;
        ensure_pending(&request)?;
        Ok(request)
    }

    /// Aplica o plano pedido e marca como aprovada.
    pub async fn approve(&self, admin: &User, id: Uuid) -> Result<UpgradeRequest, AppError> {
        let request = self.pending(id).await?;
        self.subscription
            .apply_plan(request.company_id, &request.requested_plan_id, admin.id)
            .await?;

        self.repo
            .decide(id, RequestStatus::Approved, admin.id, None)
            .await?
            .ok_or(AppError::InvalidRequestState)
    }

    pub async fn reject(&self, admin: &User, id: Uuid, reason: Option<&str>) -> Result<UpgradeRequest, AppError> {
        self.pending(id).await?;
        self.repo
            .decide(id, RequestStatus::Rejected, admin.id, reason)
            .await?
            .ok_or(AppError::InvalidRequestState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(status: RequestStatus) -> UpgradeRequest {
        UpgradeRequest {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_name: "Güneş Enerji".into(),
            requested_plan_id: "professional".into(),
            current_plan_id: "trial".into(),
            requested_by: Uuid::new_v4(),
            note: None,
            status,
            decided_by: None,
            decided_at: None,
            reject_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_pending_requests_can_be_decided() {
        assert!(ensure_pending(&request(RequestStatus::Pending)).is_ok());
        for status in [RequestStatus::Approved, RequestStatus::Rejected] {
            assert!(matches!(ensure_pending(&request(status)), Err(AppError::InvalidRequestState)));
        }
    }
}
