// src/models/site.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Saha: área física que agrupa santraller
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    #[schema(example = "Konya GES Sahası")]
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PowerPlant {
    pub id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub site_id: Uuid,
    #[schema(example = "Konya-1")]
    pub name: String,
    #[schema(example = "1250.00")]
    pub capacity_kw: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSitePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantPayload {
    pub site_id: Uuid,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub capacity_kw: Decimal,
}
