// src/services/fault_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FaultRepository,
    models::{
        auth::User,
        fault::{
            CreateFaultPayload, Fault, FaultFilter, FaultPriority, FaultStatistics, FaultStatus, ResolveFaultPayload,
            UpdateFaultPayload,
        },
        plan::LimitedResource,
    },
    services::{
        storage_service::{ensure_tenant_key, StorageService},
        subscription_service::SubscriptionService,
        visibility::{filter_visible, Viewer, VisibilityPolicy},
    },
};

/// Aplica a atualização parcial. Fotos são anexadas; passar a `Resolved` carimba `resolved_at`.
pub fn apply_fault_update(mut fault: Fault, payload: &UpdateFaultPayload, now: DateTime<Utc>) -> Fault {
    if let Some(title) = &payload.title {
        fault.title = title.clone();
    }
    if let Some(description) = &payload.description {
        fault.description = description.clone();
    }
    if let Some(priority) = payload.priority {
        fault.priority = priority;
    }
    if let Some(assigned_to) = payload.assigned_to {
        fault.assigned_to = Some(assigned_to);
    }
    if let Some(status) = payload.status {
        if status == FaultStatus::Resolved && fault.status != FaultStatus::Resolved {
            fault.resolved_at = Some(now);
        } else if status != FaultStatus::Resolved {
            fault.resolved_at = None;
        }
        fault.status = status;
    }
    for photo in &payload.photos {
        if !fault.photos.contains(photo) {
            fault.photos.push(photo.clone());
        }
    }
    fault
}

pub fn fault_statistics(faults: &[Fault]) -> FaultStatistics {
    faults.iter().fold(FaultStatistics::default(), |mut stats, f| {
        stats.total += 1;
        match f.status {
            FaultStatus::Open => stats.open += 1,
            FaultStatus::InProgress => stats.in_progress += 1,
            FaultStatus::Pending => stats.pending += 1,
            FaultStatus::Resolved => stats.resolved += 1,
        }
        if f.status != FaultStatus::Resolved {
            match f.priority {
                FaultPriority::Critical => stats.critical_open += 1,
                FaultPriority::High => stats.high_open += 1,
                FaultPriority::Low | FaultPriority::Normal => {}
            }
        }
        stats
    })
}

#[derive(Clone)]
pub struct FaultService {
    repo: FaultRepository,
    subscription: SubscriptionService,
    storage: StorageService,
}

impl FaultService {
    pub fn new(repo: FaultRepository, subscription: SubscriptionService, storage: StorageService) -> Self {
        Self { repo, subscription, storage }
    }

    pub async fn create(&self, user: &User, company_id: Uuid, payload: &CreateFaultPayload) -> Result<Fault, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        self.subscription.enforce_limit(company_id, LimitedResource::FaultRecords).await?;

        let fault = self.repo.create(company_id, user.id, payload).await?;
        tracing::info!("⚡ Arıza '{}' registrada por {}", fault.title, user.email);
        Ok(fault)
    }

    pub async fn get(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<Fault, AppError> {
        let fault = self.repo.find(company_id, id).await?.ok_or(AppError::RecordNotFound("fault"))?;
        if !Viewer::from(user).can_see(&fault, VisibilityPolicy::AnyAssigned) {
            return Err(AppError::RecordNotFound("fault"));
        }
        Ok(fault)
    }

    pub async fn list(&self, user: &User, company_id: Uuid, filter: &FaultFilter) -> Result<Vec<Fault>, AppError> {
        let faults = self.repo.list(company_id, filter).await?;
        Ok(filter_visible(faults, &Viewer::from(user), VisibilityPolicy::AnyAssigned))
    }

    /// Estatísticas sobre as arızas visíveis ao usuário.
    pub async fn statistics(&self, user: &User, company_id: Uuid) -> Result<FaultStatistics, AppError> {
        let faults = self.list(user, company_id, &FaultFilter::default()).await?;
        Ok(fault_statistics(&faults))
    }

    pub async fn update(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateFaultPayload,
    ) -> Result<Fault, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        let fault = self.get(user, company_id, id).await?;
        self.repo.update(&apply_fault_update(fault, payload, Utc::now())).await
    }

    pub async fn resolve(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &ResolveFaultPayload,
    ) -> Result<Fault, AppError> {
        let mut fault = self.get(user, company_id, id).await?;
        fault.resolution = Some(payload.resolution.clone());
        let update = UpdateFaultPayload { status: Some(FaultStatus::Resolved), ..Default::default() };
        self.repo.update(&apply_fault_update(fault, &update, Utc::now())).await
    }

    /// Remove o registro e, em seguida, as fotos anexadas.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let fault = self.repo.delete(company_id, id).await?.ok_or(AppError::RecordNotFound("fault"))?;
        self.storage.delete_attachments(company_id, &fault.photos).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault() -> Fault {
        Fault {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: None,
            plant_id: None,
            title: "İnverter arızası".into(),
            description: String::new(),
            status: FaultStatus::Open,
            priority: FaultPriority::Normal,
            photos: vec!["a.jpg".into()],
            reported_by: Uuid::new_v4(),
            assigned_to: None,
            resolution: None,
            resolved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn photos_are_appended_without_duplicates() {
        let payload = UpdateFaultPayload {
            photos: vec!["a.jpg".into(), "b.jpg".into()],
            ..Default::default()
        };
        let updated = apply_fault_update(fault(), &payload, Utc::now());
        assert_eq!(updated.photos, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn resolving_stamps_resolved_at_and_reopening_clears_it() {
        let now = Utc::now();
        let resolved = apply_fault_update(
            fault(),
            &UpdateFaultPayload { status: Some(FaultStatus::Resolved), ..Default::default() },
            now,
        );
        assert_eq!(resolved.resolved_at, Some(now));

        let reopened = apply_fault_update(
            resolved,
            &UpdateFaultPayload { status: Some(FaultStatus::InProgress), ..Default::default() },
            now,
        );
        assert_eq!(reopened.status, FaultStatus::InProgress);
        assert!(reopened.resolved_at.is_none());
    }

    #[test]
    fn untouched_fields_are_kept() {
        let original = fault();
        let updated = apply_fault_update(
            original.clone(),
            &UpdateFaultPayload { priority: Some(FaultPriority::Critical), ..Default::default() },
            Utc::now(),
        );
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.priority, FaultPriority::Critical);
        assert_eq!(updated.status, FaultStatus::Open);
    }

    #[test]
    fn statistics_count_statuses_and_unresolved_urgent_faults() {
        let with = |status, priority| Fault { status, priority, ..fault() };
        let faults = [
            with(FaultStatus::Open, FaultPriority::Critical),
            with(FaultStatus::InProgress, FaultPriority::High),
            with(FaultStatus::Pending, FaultPriority::Normal),
            with(FaultStatus::Resolved, FaultPriority::Critical),
            with(FaultStatus::Resolved, FaultPriority::High),
            with(FaultStatus::Open, FaultPriority::Low),
        ];

        let stats = fault_statistics(&faults);
        assert_eq!(
            stats,
            FaultStatistics {
                total: 6,
                open: 2,
                in_progress: 1,
                pending: 1,
                resolved: 2,
                critical_open: 1,
                high_open: 1,
            }
        );
        assert_eq!(fault_statistics(&[]), FaultStatistics::default());
    }
}
