// src/models/upgrade.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequest {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    #[schema(example = "professional")]
    pub requested_plan_id: String,
    #[schema(example = "trial")]
    pub current_plan_id: String,
    pub requested_by: Uuid,
    pub note: Option<String>,
    pub status: RequestStatus,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpgradeRequestPayload {
    #[validate(length(min = 1, message = "required"))]
    pub plan_id: String,
    #[validate(length(max = 1000, message = "too_long"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectUpgradePayload {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpgradeRequestFilter {
    pub status: Option<RequestStatus>,
}
