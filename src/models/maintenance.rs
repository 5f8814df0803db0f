// src/models/maintenance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Electrical,
    Mechanical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "general_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GeneralStatus {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub kind: MaintenanceKind,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    pub performed_by: String,
    /// Checklist livre (ex.: `{"panelCleaning": true, "inverterCheck": "ok"}`)
    pub checks: Value,
    pub general_status: GeneralStatus,
    pub notes: Option<String>,
    pub photos: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenancePayload {
    pub kind: MaintenanceKind,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    #[validate(length(min = 1, message = "required"))]
    pub performed_by: String,
    #[serde(default = "empty_object")]
    pub checks: Value,
    pub general_status: GeneralStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenancePayload {
    pub performed_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "required"))]
    pub performed_by: Option<String>,
    pub checks: Option<Value>,
    pub general_status: Option<GeneralStatus>,
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceFilter {
    pub kind: Option<MaintenanceKind>,
    pub plant_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub good: i64,
    pub fair: i64,
    pub poor: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatistics {
    pub total: i64,
    pub electrical: i64,
    pub mechanical: i64,
    pub by_status: StatusCounts,
    pub last_maintenance: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Normal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecommendation {
    pub kind: MaintenanceKind,
    pub reason: String,
    pub priority: RecommendationPriority,
    pub suggested_date: DateTime<Utc>,
}

// --- Relatórios de serviço (yapılan işler) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkCategory {
    Maintenance,
    Repair,
    Installation,
    Inspection,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkReport {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    pub performed_by: String,
    pub title: String,
    pub description: String,
    pub category: WorkCategory,
    pub duration_hours: Option<Decimal>,
    pub materials: Vec<String>,
    pub photos: Vec<String>,
    pub completed: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkReportPayload {
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub performed_at: DateTime<Utc>,
    #[validate(length(min = 1, message = "required"))]
    pub performed_by: String,
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: WorkCategory,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub duration_hours: Option<Decimal>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkReportPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<WorkCategory>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub duration_hours: Option<Decimal>,
    pub materials: Option<Vec<String>>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub completed: Option<bool>,
}
