// src/models/outage.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PowerOutage {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub cause: String,
    pub affected_capacity_kw: Option<Decimal>,
    pub lost_production_kwh: Option<Decimal>,
    pub lost_revenue: Option<Decimal>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutagePayload {
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "negative_value"))]
    pub duration_minutes: Option<i64>,
    #[validate(length(min = 1, message = "required"))]
    pub cause: String,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub affected_capacity_kw: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub lost_production_kwh: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub lost_revenue: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutagePayload {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    #[validate(range(min = 0, message = "negative_value"))]
    pub duration_minutes: Option<i64>,
    #[validate(length(min = 1, message = "required"))]
    pub cause: Option<String>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub affected_capacity_kw: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub lost_production_kwh: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub lost_revenue: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutageFilter {
    pub site_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ongoing_only: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutageStatistics {
    pub count: i64,
    pub ongoing: i64,
    pub total_minutes: i64,
    pub total_lost_production_kwh: Decimal,
    pub total_lost_revenue: Decimal,
    pub average_minutes: i64,
    pub by_site: BTreeMap<Uuid, SiteOutageTotals>,
    pub by_cause: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOutageTotals {
    pub count: i64,
    pub total_minutes: i64,
    pub lost_production_kwh: Decimal,
    pub lost_revenue: Decimal,
}
