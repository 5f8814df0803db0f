// src/services/payment_service.rs

//! Checkout simulado (sandbox): nenhuma cobrança real é feita.

use std::future::Future;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PaymentRepository,
    models::{
        auth::User,
        payment::{PaymentSession, PaymentStatus},
    },
    services::{plan_service::PlanService, subscription_service::SubscriptionService},
};

pub fn checkout_token() -> String {
    format!("mock_{}", Uuid::new_v4().simple())
}

pub fn outcome(success: bool) -> PaymentStatus {
    if success { PaymentStatus::Succeeded } else { PaymentStatus::Cancelled }
}

/// Sucesso aplica o plano antes de fechar a sessão: se a aplicação falhar,
/// a sessão continua pendente e o checkout pode ser confirmado de novo.
async fn settle_checkout<T, A, FA, C, FC>(success: bool, apply: A, complete: C) -> Result<T, AppError>
where
    A: FnOnce() -> FA,
    FA: Future<Output = Result<(), AppError>>,
    C: FnOnce(PaymentStatus) -> FC,
    FC: Future<Output = Result<Option<T>, AppError>>,
{
    if success {
        apply().await?;
    }
    complete(outcome(success)).await?.ok_or(AppError::InvalidRequestState)
}

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    plan_service: PlanService,
    subscription: SubscriptionService,
}

impl PaymentService {
    pub fn new(repo: PaymentRepository, plan_service: PlanService, subscription: SubscriptionService) -> Self {
        Self { repo, plan_service, subscription }
    }

    pub async fn start_checkout(&self, user: &User, company_id: Uuid, plan_id: &str) -> Result<PaymentSession, AppError> {
        let plan = self
            .plan_service
            .resolve_plan(plan_id)
            .await?
            .ok_or_else(|| AppError::PlanNotFound(plan_id.to_string()))?;

        self.repo
            .create(company_id, &plan.id, plan.price, &plan.currency, &checkout_token(), user.id)
            .await
    }

    /// Conclui a sessão pendente; sucesso aplica o plano à empresa.
    pub async fn confirm(
        &self,
        user: &User,
        company_id: Uuid,
        token: &str,
        success: bool,
    ) -> Result<PaymentSession, AppError> {
        let session = self
            .repo
            .find_by_token(company_id, token)
            .await?
            .ok_or(AppError::RecordNotFound("payment_session"))?;
        if session.status != PaymentStatus::Pending {
            return Err(AppError::InvalidRequestState);
        }

        let (session_id, plan_id, actor) = (session.id, session.plan_id.as_str(), user.id);
        let completed = settle_checkout(
            success,
            || async move {
                self.subscription.apply_plan(company_id, plan_id, actor).await?;
                Ok(())
            },
            |status| self.repo.complete(session_id, status),
        )
        .await?;
        tracing::info!("💳 Checkout {} concluído: {:?}", completed.token, completed.status);
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_opaque_and_unique() {
        let a = checkout_token();
        let b = checkout_token();
        assert!(a.starts_with("mock_"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn failed_plan_application_leaves_session_pending() {
        let completed = std::sync::Mutex::new(None);

        let result: Result<PaymentStatus, AppError> = settle_checkout(
            true,
            || async { Err::<(), _>(AppError::PlanNotFound("pro".into())) },
            |status| {
                *completed.lock().unwrap() = Some(status);
                async move { Ok(Some(status)) }
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::PlanNotFound(_))));
        assert!(completed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn cancelled_checkout_skips_plan_application() {
        let applied = std::sync::Mutex::new(false);

        let status = settle_checkout(
            false,
            || {
                *applied.lock().unwrap() = true;
                async { Ok(()) }
            },
            |status| async move { Ok(Some(status)) },
        )
        .await
        .unwrap();

        assert_eq!(status, PaymentStatus::Cancelled);
        assert!(!*applied.lock().unwrap());
    }

    #[tokio::test]
    async fn session_closed_elsewhere_is_a_state_conflict() {
        let result: Result<PaymentStatus, AppError> =
            settle_checkout(true, || async { Ok(()) }, |_| async { Ok(None) }).await;

        assert!(matches!(result, Err(AppError::InvalidRequestState)));
    }

    #[test]
    fn outcome_maps_success_flag() {
        assert_eq!(outcome(true), PaymentStatus::Succeeded);
        assert_eq!(outcome(false), PaymentStatus::Cancelled);
    }
}
