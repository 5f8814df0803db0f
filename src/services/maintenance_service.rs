// src/services/maintenance_service.rs

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MaintenanceRepository, WorkReportRepository},
    models::{
        auth::User,
        maintenance::{
            CreateMaintenancePayload, CreateWorkReportPayload, GeneralStatus, MaintenanceFilter, MaintenanceKind,
            MaintenanceRecommendation, MaintenanceRecord, MaintenanceStatistics, RecommendationPriority,
            StatusCounts, UpdateMaintenancePayload, UpdateWorkReportPayload, WorkReport,
        },
        plan::LimitedResource,
    },
    services::{
        storage_service::{ensure_tenant_key, StorageService},
        subscription_service::SubscriptionService,
        visibility::{filter_visible, Viewer, VisibilityPolicy},
    },
};

const ELECTRICAL_INTERVAL_DAYS: i64 = 180;
const MECHANICAL_INTERVAL_DAYS: i64 = 90;

fn append_photos(photos: &mut Vec<String>, new: &[String]) {
    for photo in new {
        if !photos.contains(photo) {
            photos.push(photo.clone());
        }
    }
}

pub fn maintenance_statistics(records: &[MaintenanceRecord]) -> MaintenanceStatistics {
    let mut by_status = StatusCounts::default();
    let mut electrical = 0;
    let mut mechanical = 0;

    for record in records {
        match record.kind {
            MaintenanceKind::Electrical => electrical += 1,
            MaintenanceKind::Mechanical => mechanical += 1,
        }
        match record.general_status {
            GeneralStatus::Good => by_status.good += 1,
            GeneralStatus::Fair => by_status.fair += 1,
            GeneralStatus::Poor => by_status.poor += 1,
        }
    }

    MaintenanceStatistics {
        total: records.len() as i64,
        electrical,
        mechanical,
        by_status,
        last_maintenance: records.iter().map(|r| r.performed_at).max(),
    }
}

/// Recomenda manutenção elétrica (sem registro em 180 dias) e mecânica (90 dias).
pub fn maintenance_plan(records: &[MaintenanceRecord], now: DateTime<Utc>) -> Vec<MaintenanceRecommendation> {
    let rules = [
        (
            MaintenanceKind::Electrical,
            ELECTRICAL_INTERVAL_DAYS,
            RecommendationPriority::High,
            7,
            "Son 6 ayda elektrik bakımı yapılmamış",
        ),
        (
            MaintenanceKind::Mechanical,
            MECHANICAL_INTERVAL_DAYS,
            RecommendationPriority::Normal,
            3,
            "Son 3 ayda mekanik bakım yapılmamış",
        ),
    ];

    rules
        .into_iter()
        .filter(|(kind, interval, ..)| {
            let cutoff = now - Duration::days(*interval);
            !records.iter().any(|r| r.kind == *kind && r.performed_at >= cutoff)
        })
        .map(|(kind, _, priority, lead_days, reason)| MaintenanceRecommendation {
            kind,
            reason: reason.to_string(),
            priority,
            suggested_date: now + Duration::days(lead_days),
        })
        .collect()
}

#[derive(Clone)]
pub struct MaintenanceService {
    repo: MaintenanceRepository,
    work_reports: WorkReportRepository,
    subscription: SubscriptionService,
    storage: StorageService,
}

impl MaintenanceService {
    pub fn new(
        repo: MaintenanceRepository,
        work_reports: WorkReportRepository,
        subscription: SubscriptionService,
        storage: StorageService,
    ) -> Self {
        Self { repo, work_reports, subscription, storage }
    }

    // =========================================================================
    //  BAKIM (elétrica / mecânica)
    // =========================================================================

    pub async fn create(
        &self,
        user: &User,
        company_id: Uuid,
        payload: &CreateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        self.subscription.enforce_limit(company_id, LimitedResource::MaintenanceRecords).await?;
        self.repo.create(company_id, user.id, payload).await
    }

    pub async fn get(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<MaintenanceRecord, AppError> {
        let record = self.repo.find(company_id, id).await?.ok_or(AppError::RecordNotFound("maintenance"))?;
        if !Viewer::from(user).can_see(&record, VisibilityPolicy::PlantsFirst) {
            return Err(AppError::RecordNotFound("maintenance"));
        }
        Ok(record)
    }

    pub async fn list(
        &self,
        user: &User,
        company_id: Uuid,
        filter: &MaintenanceFilter,
    ) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = self.repo.list(company_id, filter.kind, filter.plant_id, filter.limit).await?;
        Ok(filter_visible(records, &Viewer::from(user), VisibilityPolicy::PlantsFirst))
    }

    pub async fn update(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateMaintenancePayload,
    ) -> Result<MaintenanceRecord, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        let mut record = self.get(user, company_id, id).await?;

        if let Some(performed_at) = payload.performed_at {
            record.performed_at = performed_at;
        }
        if let Some(performed_by) = &payload.performed_by {
            record.performed_by = performed_by.clone();
        }
        if let Some(checks) = &payload.checks {
            record.checks = checks.clone();
        }
        if let Some(status) = payload.general_status {
            record.general_status = status;
        }
        if payload.notes.is_some() {
            record.notes = payload.notes.clone();
        }
        append_photos(&mut record.photos, &payload.photos);

        self.repo.update(&record).await
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let record = self.repo.delete(company_id, id).await?.ok_or(AppError::RecordNotFound("maintenance"))?;
        self.storage.delete_attachments(company_id, &record.photos).await;
        Ok(())
    }

    pub async fn statistics(&self, user: &User, company_id: Uuid) -> Result<MaintenanceStatistics, AppError> {
        let records = self.list(user, company_id, &MaintenanceFilter::default()).await?;
        Ok(maintenance_statistics(&records))
    }

    /// Histórico completo da santral (elétrica + mecânica), mais recentes primeiro.
    pub async fn plant_history(&self, user: &User, company_id: Uuid, plant_id: Uuid) -> Result<Vec<MaintenanceRecord>, AppError> {
        let filter = MaintenanceFilter { plant_id: Some(plant_id), ..Default::default() };
        self.list(user, company_id, &filter).await
    }

    pub async fn plan_for_plant(
        &self,
        user: &User,
        company_id: Uuid,
        plant_id: Uuid,
    ) -> Result<Vec<MaintenanceRecommendation>, AppError> {
        let history = self.plant_history(user, company_id, plant_id).await?;
        Ok(maintenance_plan(&history, Utc::now()))
    }

    // =========================================================================
    //  RELATÓRIOS DE SERVIÇO
    // =========================================================================

    pub async fn create_report(
        &self,
        user: &User,
        company_id: Uuid,
        payload: &CreateWorkReportPayload,
    ) -> Result<WorkReport, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        self.work_reports.create(company_id, user.id, payload).await
    }

    pub async fn get_report(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<WorkReport, AppError> {
        let report = self
            .work_reports
            .find(company_id, id)
            .await?
            .ok_or(AppError::RecordNotFound("work_report"))?;
        if !Viewer::from(user).can_see(&report, VisibilityPolicy::PlantsFirst) {
            return Err(AppError::RecordNotFound("work_report"));
        }
        Ok(report)
    }

    pub async fn list_reports(&self, user: &User, company_id: Uuid) -> Result<Vec<WorkReport>, AppError> {
        let reports = self.work_reports.list(company_id).await?;
        Ok(filter_visible(reports, &Viewer::from(user), VisibilityPolicy::PlantsFirst))
    }

    pub async fn update_report(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateWorkReportPayload,
    ) -> Result<WorkReport, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        let mut report = self.get_report(user, company_id, id).await?;

        if let Some(title) = &payload.title {
            report.title = title.clone();
        }
        if let Some(description) = &payload.description {
            report.description = description.clone();
        }
        if let Some(category) = payload.category {
            report.category = category;
        }
        if payload.duration_hours.is_some() {
            report.duration_hours = payload.duration_hours;
        }
        if let Some(materials) = &payload.materials {
            report.materials = materials.clone();
        }
        if let Some(completed) = payload.completed {
            report.completed = completed;
        }
        append_photos(&mut report.photos, &payload.photos);

        self.work_reports.update(&report).await
    }

    pub async fn delete_report(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let report = self
            .work_reports
            .delete(company_id, id)
            .await?
            .ok_or(AppError::RecordNotFound("work_report"))?;
        self.storage.delete_attachments(company_id, &report.photos).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: MaintenanceKind, status: GeneralStatus, performed_at: DateTime<Utc>) -> MaintenanceRecord {
        MaintenanceRecord {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            kind,
            site_id: None,
            plant_id: None,
            performed_at,
            performed_by: "Mehmet".into(),
            checks: json!({"panelCleaning": true}),
            general_status: status,
            notes: None,
            photos: vec![],
            created_by: Uuid::new_v4(),
            created_at: performed_at,
            updated_at: performed_at,
        }
    }

    #[test]
    fn statistics_count_kinds_and_statuses() {
        let now = Utc::now();
        let records = vec![
            record(MaintenanceKind::Electrical, GeneralStatus::Good, now - Duration::days(3)),
            record(MaintenanceKind::Mechanical, GeneralStatus::Poor, now - Duration::days(1)),
            record(MaintenanceKind::Electrical, GeneralStatus::Good, now - Duration::days(10)),
        ];

        let stats = maintenance_statistics(&records);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.electrical, 2);
        assert_eq!(stats.mechanical, 1);
        assert_eq!(stats.by_status.good, 2);
        assert_eq!(stats.by_status.poor, 1);
        assert_eq!(stats.last_maintenance, Some(now - Duration::days(1)));
    }

    #[test]
    fn empty_history_recommends_both_kinds() {
        let now = Utc::now();
        let plan = maintenance_plan(&[], now);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].kind, MaintenanceKind::Electrical);
        assert_eq!(plan[0].priority, RecommendationPriority::High);
        assert_eq!(plan[0].suggested_date, now + Duration::days(7));
        assert_eq!(plan[1].kind, MaintenanceKind::Mechanical);
        assert_eq!(plan[1].priority, RecommendationPriority::Normal);
        assert_eq!(plan[1].suggested_date, now + Duration::days(3));
    }

    #[test]
    fn recent_work_suppresses_recommendation() {
        let now = Utc::now();
        let records = vec![
            record(MaintenanceKind::Electrical, GeneralStatus::Good, now - Duration::days(179)),
            record(MaintenanceKind::Mechanical, GeneralStatus::Good, now - Duration::days(91)),
        ];

        let plan = maintenance_plan(&records, now);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].kind, MaintenanceKind::Mechanical);
    }
}
