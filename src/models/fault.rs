// src/models/fault.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fault_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FaultStatus {
    Open,
    InProgress,
    Pending,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fault_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FaultPriority {
    Low,
    Normal,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fault {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: FaultStatus,
    pub priority: FaultPriority,
    pub photos: Vec<String>,
    pub reported_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub resolution: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaultPayload {
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Option<FaultPriority>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFaultPayload {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<FaultStatus>,
    pub priority: Option<FaultPriority>,
    pub assigned_to: Option<Uuid>,
    // Fotos novas são anexadas às existentes
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveFaultPayload {
    #[validate(length(min = 1, message = "required"))]
    pub resolution: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultFilter {
    pub status: Option<FaultStatus>,
    pub priority: Option<FaultPriority>,
    pub site_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Contagem por status; `critical_open`/`high_open` ignoram os resolvidos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultStatistics {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub pending: i64,
    pub resolved: i64,
    pub critical_open: i64,
    pub high_open: i64,
}
