// src/services/shift_service.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ShiftRepository,
    models::{
        auth::User,
        shift::{CreateShiftPayload, ShiftCondition, ShiftFilter, ShiftReport, UpdateShiftPayload},
    },
    services::{
        storage_service::{ensure_tenant_key, StorageService},
        visibility::{filter_visible, Viewer, VisibilityPolicy},
    },
};

/// Condição `Emergency` sempre liga a flag de emergência.
pub fn emergency_flag(condition: ShiftCondition, emergency: bool) -> bool {
    emergency || condition == ShiftCondition::Emergency
}

/// Início do dia (UTC) e início do dia seguinte.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Aplica a atualização parcial; fotos são anexadas.
pub fn apply_shift_update(mut report: ShiftReport, payload: &UpdateShiftPayload) -> ShiftReport {
    if let Some(shift_type) = payload.shift_type {
        report.shift_type = shift_type;
    }
    if let Some(starts_at) = payload.starts_at {
        report.starts_at = starts_at;
    }
    if let Some(ends_at) = payload.ends_at {
        report.ends_at = ends_at;
    }
    if let Some(personnel) = &payload.personnel {
        report.personnel = Json(personnel.clone());
    }
    if let Some(condition) = payload.condition {
        report.condition = condition;
    }
    if let Some(emergency) = payload.emergency {
        report.emergency = emergency;
    }
    report.emergency = emergency_flag(report.condition, report.emergency);
    if let Some(observations) = &payload.observations {
        report.observations = Json(observations.clone());
    }
    if let Some(tasks_done) = &payload.tasks_done {
        report.tasks_done = tasks_done.clone();
    }
    if let Some(location) = &payload.location {
        report.location = Some(Json(location.clone()));
    }
    if let Some(weather) = &payload.weather {
        report.weather = Some(Json(weather.clone()));
    }
    if let Some(checks) = &payload.security_checks {
        report.security_checks = Some(Json(checks.clone()));
    }
    if let Some(checks) = &payload.equipment_checks {
        report.equipment_checks = Some(Json(checks.clone()));
    }
    for photo in &payload.photos {
        if !report.photos.contains(photo) {
            report.photos.push(photo.clone());
        }
    }
    report
}

#[derive(Clone)]
pub struct ShiftService {
    repo: ShiftRepository,
    storage: StorageService,
}

impl ShiftService {
    pub fn new(repo: ShiftRepository, storage: StorageService) -> Self {
        Self { repo, storage }
    }

    pub async fn create(&self, user: &User, company_id: Uuid, payload: &CreateShiftPayload) -> Result<ShiftReport, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        let emergency = emergency_flag(payload.condition, payload.emergency);
        let report = self.repo.create(company_id, user.id, payload, emergency).await?;

        if report.is_urgent() {
            tracing::warn!("🚨 Vardiya de emergência na saha {} por {}", report.site_id, user.email);
        } else {
            tracing::info!("🛡️ Vardiya {:?} registrada na saha {}", report.shift_type, report.site_id);
        }
        Ok(report)
    }

    pub async fn get(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<ShiftReport, AppError> {
        let report = self
            .repo
            .find(company_id, id)
            .await?
            .ok_or(AppError::RecordNotFound("shift_report"))?;
        if !Viewer::from(user).can_see(&report, VisibilityPolicy::AnyAssigned) {
            return Err(AppError::RecordNotFound("shift_report"));
        }
        Ok(report)
    }

    pub async fn list(&self, user: &User, company_id: Uuid, filter: &ShiftFilter) -> Result<Vec<ShiftReport>, AppError> {
        let reports = self.repo.list(company_id, filter).await?;
        Ok(filter_visible(reports, &Viewer::from(user), VisibilityPolicy::AnyAssigned))
    }

    pub async fn by_site(&self, user: &User, company_id: Uuid, site_id: Uuid) -> Result<Vec<ShiftReport>, AppError> {
        let filter = ShiftFilter { site_id: Some(site_id), ..Default::default() };
        self.list(user, company_id, &filter).await
    }

    pub async fn today(&self, user: &User, company_id: Uuid) -> Result<Vec<ShiftReport>, AppError> {
        let (from, to) = day_bounds(Utc::now());
        let filter = ShiftFilter { from: Some(from), to: Some(to), ..Default::default() };
        self.list(user, company_id, &filter).await
    }

    pub async fn urgent(&self, user: &User, company_id: Uuid) -> Result<Vec<ShiftReport>, AppError> {
        let filter = ShiftFilter { urgent_only: true, ..Default::default() };
        self.list(user, company_id, &filter).await
    }

    /// Relatórios criados pelo próprio usuário.
    pub async fn mine(&self, user: &User, company_id: Uuid) -> Result<Vec<ShiftReport>, AppError> {
        let filter = ShiftFilter { created_by: Some(user.id), ..Default::default() };
        self.list(user, company_id, &filter).await
    }

    pub async fn update(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateShiftPayload,
    ) -> Result<ShiftReport, AppError> {
        for key in &payload.photos {
            ensure_tenant_key(company_id, key)?;
        }
        let report = self.get(user, company_id, id).await?;
        let was_urgent = report.is_urgent();

        let updated = self.repo.update(&apply_shift_update(report, payload)).await?;
        if updated.is_urgent() && !was_urgent {
            tracing::warn!("🚨 Vardiya {} passou a emergência na saha {}", updated.id, updated.site_id);
        }
        Ok(updated)
    }

    /// Remove o registro e, em seguida, as fotos anexadas.
    pub async fn delete(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.get(user, company_id, id).await?;
        let report = self
            .repo
            .delete(company_id, id)
            .await?
            .ok_or(AppError::RecordNotFound("shift_report"))?;
        self.storage.delete_attachments(company_id, &report.photos).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone};

    use crate::models::{
        auth::Role,
        shift::{SecurityChecks, ShiftMember, ShiftType},
    };

    fn report() -> ShiftReport {
        let now = Utc::now();
        ShiftReport {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            shift_date: now,
            shift_type: ShiftType::Night,
            starts_at: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            ends_at: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            personnel: Json(vec![]),
            condition: ShiftCondition::Normal,
            emergency: false,
            observations: Json(vec![]),
            tasks_done: vec!["Çevre turu".into()],
            photos: vec!["companies/c/vardiya/1.jpg".into()],
            location: None,
            weather: None,
            security_checks: None,
            equipment_checks: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn emergency_condition_forces_the_flag() {
        assert!(emergency_flag(ShiftCondition::Emergency, false));
        assert!(emergency_flag(ShiftCondition::Normal, true));
        assert!(!emergency_flag(ShiftCondition::Attention, false));
    }

    #[test]
    fn escalating_the_condition_marks_the_report_urgent() {
        let payload = UpdateShiftPayload {
            condition: Some(ShiftCondition::Emergency),
            emergency: Some(false),
            ..Default::default()
        };
        let updated = apply_shift_update(report(), &payload);
        assert!(updated.emergency);
        assert!(updated.is_urgent());
    }

    #[test]
    fn update_replaces_lists_and_appends_photos() {
        let payload = UpdateShiftPayload {
            personnel: Some(vec![ShiftMember { user_id: None, name: "Ali".into(), role: Some("bekci".into()), phone: None }]),
            photos: vec!["companies/c/vardiya/1.jpg".into(), "companies/c/vardiya/2.jpg".into()],
            security_checks: Some(SecurityChecks { cameras: true, ..Default::default() }),
            ..Default::default()
        };
        let original = report();
        let updated = apply_shift_update(original.clone(), &payload);

        assert_eq!(updated.personnel.0.len(), 1);
        assert_eq!(updated.photos.len(), 2);
        assert_eq!(updated.tasks_done, original.tasks_done);
        assert!(updated.security_checks.unwrap().0.cameras);
        assert_eq!(updated.shift_type, ShiftType::Night);
    }

    #[test]
    fn today_spans_one_utc_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 15, 30, 0).unwrap();
        let (from, to) = day_bounds(now);
        assert_eq!(from.to_rfc3339(), "2025-06-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2025-06-02T00:00:00+00:00");
    }

    #[test]
    fn guards_only_see_reports_of_their_sites() {
        let mine = report();
        let other = report();
        let sites = [mine.site_id];
        let guard = Viewer { role: Role::Guard, sites: &sites, plants: &[] };

        let visible = filter_visible(vec![mine.clone(), other], &guard, VisibilityPolicy::AnyAssigned);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, mine.id);
    }
}
