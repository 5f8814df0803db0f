// src/services/outage_service.rs

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OutageRepository,
    models::{
        auth::User,
        outage::{CreateOutagePayload, OutageFilter, OutageStatistics, PowerOutage, UpdateOutagePayload},
    },
    services::visibility::{filter_visible, Viewer, VisibilityPolicy},
};

/// Duração em minutos inteiros (arredondada para baixo, nunca negativa).
pub fn duration_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    ((ended_at - started_at).num_seconds() / 60).max(0)
}

/// Duração explícita tem prioridade; senão é derivada do fim, se houver.
fn resolve_duration(explicit: Option<i64>, started_at: DateTime<Utc>, ended_at: Option<DateTime<Utc>>) -> Option<i64> {
    explicit.or_else(|| ended_at.map(|end| duration_minutes(started_at, end)))
}

pub fn apply_outage_update(mut outage: PowerOutage, payload: &UpdateOutagePayload) -> PowerOutage {
    if let Some(started_at) = payload.started_at {
        outage.started_at = started_at;
    }
    if let Some(cause) = &payload.cause {
        outage.cause = cause.clone();
    }
    if payload.affected_capacity_kw.is_some() {
        outage.affected_capacity_kw = payload.affected_capacity_kw;
    }
    if payload.lost_production_kwh.is_some() {
        outage.lost_production_kwh = payload.lost_production_kwh;
    }
    if payload.lost_revenue.is_some() {
        outage.lost_revenue = payload.lost_revenue;
    }
    if payload.description.is_some() {
        outage.description = payload.description.clone();
    }

    if payload.ended_at.is_some() {
        outage.ended_at = payload.ended_at;
    }

    // Qualquer limite alterado recalcula a duração, salvo valor explícito
    if payload.duration_minutes.is_some() {
        outage.duration_minutes = payload.duration_minutes;
    } else if payload.started_at.is_some() || payload.ended_at.is_some() {
        if let Some(ended_at) = outage.ended_at {
            outage.duration_minutes = Some(duration_minutes(outage.started_at, ended_at));
        }
    }
    outage
}

const UNSPECIFIED_CAUSE: &str = "Belirtilmemiş";

pub fn outage_statistics(outages: &[PowerOutage]) -> OutageStatistics {
    let mut stats = outages.iter().fold(OutageStatistics::default(), |mut stats, o| {
        let minutes = o.duration_minutes.unwrap_or(0);
        let lost_kwh = o.lost_production_kwh.unwrap_or(Decimal::ZERO);
        let lost_revenue = o.lost_revenue.unwrap_or(Decimal::ZERO);

        stats.count += 1;
        if o.ended_at.is_none() {
            stats.ongoing += 1;
        }
        stats.total_minutes += minutes;
        stats.total_lost_production_kwh += lost_kwh;
        stats.total_lost_revenue += lost_revenue;

        let site = stats.by_site.entry(o.site_id).or_default();
        site.count += 1;
        site.total_minutes += minutes;
        site.lost_production_kwh += lost_kwh;
        site.lost_revenue += lost_revenue;

        let cause = match o.cause.trim() {
            "" => UNSPECIFIED_CAUSE,
            cause => cause,
        };
        *stats.by_cause.entry(cause.to_string()).or_default() += 1;
        stats
    });

    if stats.count > 0 {
        stats.average_minutes = (stats.total_minutes as f64 / stats.count as f64).round() as i64;
    }
    stats
}

fn year_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?.and_hms_opt(23, 59, 59)?;
    Some((Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end)))
}

#[derive(Clone)]
pub struct OutageService {
    repo: OutageRepository,
}

impl OutageService {
    pub fn new(repo: OutageRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user: &User, company_id: Uuid, payload: &CreateOutagePayload) -> Result<PowerOutage, AppError> {
        let duration = resolve_duration(payload.duration_minutes, payload.started_at, payload.ended_at);
        let outage = self.repo.create(company_id, user.id, payload, duration).await?;
        tracing::info!("🔌 Kesinti registrada na saha {} ({})", outage.site_id, outage.cause);
        Ok(outage)
    }

    pub async fn get(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<PowerOutage, AppError> {
        let outage = self.repo.find(company_id, id).await?.ok_or(AppError::RecordNotFound("outage"))?;
        if !Viewer::from(user).can_see(&outage, VisibilityPolicy::AnyAssigned) {
            return Err(AppError::RecordNotFound("outage"));
        }
        Ok(outage)
    }

    pub async fn list(&self, user: &User, company_id: Uuid, filter: &OutageFilter) -> Result<Vec<PowerOutage>, AppError> {
        let outages = self.repo.list(company_id, filter).await?;
        Ok(filter_visible(outages, &Viewer::from(user), VisibilityPolicy::AnyAssigned))
    }

    pub async fn update(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateOutagePayload,
    ) -> Result<PowerOutage, AppError> {
        let outage = self.get(user, company_id, id).await?;
        self.repo.update(&apply_outage_update(outage, payload)).await
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(company_id, id).await? {
            return Err(AppError::RecordNotFound("outage"));
        }
        Ok(())
    }

    pub async fn statistics(&self, user: &User, company_id: Uuid, year: Option<i32>) -> Result<OutageStatistics, AppError> {
        let mut filter = OutageFilter::default();
        if let Some(year) = year {
            let (from, to) = year_bounds(year).ok_or(AppError::RecordNotFound("year"))?;
            filter.from = Some(from);
            filter.to = Some(to);
        }
        let outages = self.list(user, company_id, &filter).await?;
        Ok(outage_statistics(&outages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn outage(started_at: DateTime<Utc>) -> PowerOutage {
        PowerOutage {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            started_at,
            ended_at: None,
            duration_minutes: None,
            cause: "TEDAŞ şebeke kesintisi".into(),
            affected_capacity_kw: None,
            lost_production_kwh: None,
            lost_revenue: None,
            description: None,
            created_by: Uuid::new_v4(),
            created_at: started_at,
            updated_at: started_at,
        }
    }

    #[test]
    fn duration_is_floored_to_whole_minutes() {
        let start = Utc::now();
        assert_eq!(duration_minutes(start, start + Duration::seconds(119)), 1);
        assert_eq!(duration_minutes(start, start + Duration::minutes(95)), 95);
        assert_eq!(duration_minutes(start, start - Duration::minutes(5)), 0);
    }

    #[test]
    fn closing_an_outage_derives_duration() {
        let start = Utc::now() - Duration::hours(2);
        let payload = UpdateOutagePayload { ended_at: Some(start + Duration::minutes(90)), ..Default::default() };

        let updated = apply_outage_update(outage(start), &payload);
        assert_eq!(updated.duration_minutes, Some(90));
    }

    #[test]
    fn explicit_duration_wins() {
        let start = Utc::now() - Duration::hours(2);
        let payload = UpdateOutagePayload {
            ended_at: Some(start + Duration::minutes(90)),
            duration_minutes: Some(45),
            ..Default::default()
        };

        let updated = apply_outage_update(outage(start), &payload);
        assert_eq!(updated.duration_minutes, Some(45));
    }

    #[test]
    fn moving_the_start_recomputes_a_closed_outage() {
        let start = Utc::now() - Duration::hours(3);
        let mut closed = outage(start);
        closed.ended_at = Some(start + Duration::minutes(90));
        closed.duration_minutes = Some(90);

        let payload = UpdateOutagePayload { started_at: Some(start + Duration::minutes(60)), ..Default::default() };
        let updated = apply_outage_update(closed, &payload);
        assert_eq!(updated.duration_minutes, Some(30));
    }

    #[test]
    fn moving_the_start_of_an_ongoing_outage_keeps_duration_empty() {
        let start = Utc::now() - Duration::hours(3);
        let payload = UpdateOutagePayload { started_at: Some(start + Duration::minutes(10)), ..Default::default() };

        let updated = apply_outage_update(outage(start), &payload);
        assert_eq!(updated.duration_minutes, None);
    }

    #[test]
    fn statistics_break_down_by_site_and_cause() {
        let start = Utc::now();
        let site = Uuid::new_v4();
        let mut first = outage(start);
        first.site_id = site;
        first.duration_minutes = Some(20);
        first.lost_revenue = Some(Decimal::from(100));
        let mut second = outage(start);
        second.site_id = site;
        second.duration_minutes = Some(25);
        second.cause = "  ".into();
        let other = outage(start);

        let stats = outage_statistics(&[first, second, other.clone()]);
        assert_eq!(stats.average_minutes, 15);
        assert_eq!(stats.by_site.len(), 2);
        assert_eq!(stats.by_site[&site].count, 2);
        assert_eq!(stats.by_site[&site].total_minutes, 45);
        assert_eq!(stats.by_site[&site].lost_revenue, Decimal::from(100));
        assert_eq!(stats.by_site[&other.site_id].count, 1);
        assert_eq!(stats.by_cause["TEDAŞ şebeke kesintisi"], 2);
        assert_eq!(stats.by_cause["Belirtilmemiş"], 1);
    }

    #[test]
    fn empty_statistics_have_zero_average() {
        let stats = outage_statistics(&[]);
        assert_eq!(stats.average_minutes, 0);
        assert!(stats.by_site.is_empty());
    }

    #[test]
    fn statistics_sum_losses_and_count_ongoing() {
        let start = Utc::now();
        let mut closed = outage(start);
        closed.ended_at = Some(start + Duration::minutes(30));
        closed.duration_minutes = Some(30);
        closed.lost_production_kwh = Some(Decimal::new(1205, 1));
        closed.lost_revenue = Some(Decimal::from(300));
        let ongoing = outage(start);

        let stats = outage_statistics(&[closed, ongoing]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.ongoing, 1);
        assert_eq!(stats.total_minutes, 30);
        assert_eq!(stats.total_lost_production_kwh, Decimal::new(1205, 1));
        assert_eq!(stats.total_lost_revenue, Decimal::from(300));
    }

    #[test]
    fn year_bounds_cover_the_whole_year() {
        let (from, to) = year_bounds(2024).unwrap();
        assert_eq!(from.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-12-31T23:59:59+00:00");
    }
}
