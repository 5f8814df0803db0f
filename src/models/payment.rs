// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Cancelled,
}

// Sessão de checkout simulada (sandbox)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub id: Uuid,
    pub company_id: Uuid,
    pub plan_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub token: String,
    pub status: PaymentStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartCheckoutPayload {
    #[validate(length(min = 1, message = "required"))]
    pub plan_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmCheckoutPayload {
    pub success: bool,
}
