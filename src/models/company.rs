// src/models/company.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::plan::LimitedResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Expired,
    Cancelled,
}

/// Limites definidos diretamente na empresa (sobrepõem o plano).
/// Aceita as chaves legadas gravadas pelo painel antigo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<i64>,
    #[serde(default, alias = "sahalar", skip_serializing_if = "Option::is_none")]
    pub sites: Option<i64>,
    #[serde(default, alias = "santraller", skip_serializing_if = "Option::is_none")]
    pub plants: Option<i64>,
    /// Texto informativo, ex.: "1.00GB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, alias = "storageLimit", skip_serializing_if = "Option::is_none")]
    pub storage_limit_mb: Option<i64>,
    #[serde(default, alias = "arizaKaydi", skip_serializing_if = "Option::is_none")]
    pub fault_records: Option<i64>,
    #[serde(default, alias = "bakimKaydi", skip_serializing_if = "Option::is_none")]
    pub maintenance_records: Option<i64>,
}

impl LimitOverrides {
    pub fn get(&self, resource: LimitedResource) -> Option<i64> {
        match resource {
            LimitedResource::Users => self.users,
            LimitedResource::Sites => self.sites,
            LimitedResource::Plants => self.plants,
            LimitedResource::FaultRecords => self.fault_records,
            LimitedResource::MaintenanceRecords => self.maintenance_records,
            LimitedResource::MonthlyApiCalls => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Güneş Enerji A.Ş.")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_key: Option<String>,

    #[schema(example = "starter")]
    pub subscription_plan: String,
    pub subscription_status: SubscriptionStatus,
    pub subscription_price: Decimal,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub trial_end_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<LimitOverrides>)]
    pub subscription_limits: Option<Json<LimitOverrides>>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn overrides(&self) -> Option<&LimitOverrides> {
        self.subscription_limits.as_ref().map(|json| &json.0)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_accept_legacy_keys() {
        let raw = r#"{"users":5,"sahalar":2,"santraller":4,"storage":"2.00GB","storageLimit":2048,"arizaKaydi":100}"#;
        let overrides: LimitOverrides = serde_json::from_str(raw).unwrap();

        assert_eq!(overrides.get(LimitedResource::Sites), Some(2));
        assert_eq!(overrides.get(LimitedResource::Plants), Some(4));
        assert_eq!(overrides.storage_limit_mb, Some(2048));
        assert_eq!(overrides.get(LimitedResource::FaultRecords), Some(100));
        assert_eq!(overrides.get(LimitedResource::MaintenanceRecords), None);
    }
}
