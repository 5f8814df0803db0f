// src/models/plan.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::company::SubscriptionStatus;

pub const UNLIMITED: i64 = -1;

/// Limites de um plano. `-1` significa ilimitado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    #[serde(default)]
    pub users: i64,
    #[serde(default, alias = "sahalar")]
    pub sites: i64,
    #[serde(default, alias = "santraller")]
    pub plants: i64,
    #[serde(default, alias = "storageGB")]
    pub storage_gb: f64,
    #[serde(default, alias = "arizaKaydi")]
    pub fault_records: i64,
    #[serde(default, alias = "bakimKaydi")]
    pub maintenance_records: i64,
    #[serde(default)]
    pub monthly_api_calls: i64,
}

impl PlanLimits {
    pub fn get(&self, resource: LimitedResource) -> i64 {
        match resource {
            LimitedResource::Users => self.users,
            LimitedResource::Sites => self.sites,
            LimitedResource::Plants => self.plants,
            LimitedResource::FaultRecords => self.fault_records,
            LimitedResource::MaintenanceRecords => self.maintenance_records,
            LimitedResource::MonthlyApiCalls => self.monthly_api_calls,
        }
    }

    /// Cota em MB derivada de `storage_gb`.
    pub fn storage_limit_mb(&self) -> i64 {
        if self.storage_gb < 0.0 {
            UNLIMITED
        } else {
            (self.storage_gb * 1024.0).round() as i64
        }
    }
}

fn default_currency() -> String {
    "TRY".to_string()
}

fn default_billing_period() -> String {
    "monthly".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    #[schema(example = "starter")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_billing_period")]
    pub billing_period: String,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub limits: PlanLimits,
    #[serde(default)]
    pub features: BTreeMap<String, Value>,
    #[serde(default)]
    pub support: Option<String>,
    #[serde(default)]
    pub popular: bool,
}

impl Plan {
    pub fn has_feature(&self, name: &str) -> bool {
        matches!(self.features.get(name), Some(Value::Bool(true)))
    }
}

pub type PlanMap = BTreeMap<String, Plan>;

/// Recursos contáveis sujeitos a limite de plano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LimitedResource {
    Users,
    Sites,
    Plants,
    FaultRecords,
    MaintenanceRecords,
    MonthlyApiCalls,
}

impl LimitedResource {
    pub fn as_str(self) -> &'static str {
        match self {
            LimitedResource::Users => "users",
            LimitedResource::Sites => "sites",
            LimitedResource::Plants => "plants",
            LimitedResource::FaultRecords => "faultRecords",
            LimitedResource::MaintenanceRecords => "maintenanceRecords",
            LimitedResource::MonthlyApiCalls => "monthlyApiCalls",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitCheck {
    pub allowed: bool,
    pub limit: i64,
    pub remaining: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Trial,
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
    pub plan_id: String,
    pub plan_name: String,
    pub status: SubscriptionState,
    pub days_remaining: i64,
    pub monthly_price: Decimal,
    pub currency: String,
    pub end_date: Option<DateTime<Utc>>,
    pub can_upgrade: bool,
    pub is_expired: bool,
    pub raw_status: SubscriptionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    pub current: f64,
    pub limit: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub users: UsageEntry,
    pub sites: UsageEntry,
    pub plants: UsageEntry,
    pub storage_gb: UsageEntry,
    pub fault_records: UsageEntry,
    pub maintenance_records: UsageEntry,
}

/// Troca manual de plano feita pelo superadmin.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPlanPayload {
    #[validate(length(min = 1, message = "required"))]
    pub plan_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_document_with_legacy_keys_parses() {
        let raw = json!({
            "name": "starter",
            "displayName": "Starter",
            "price": 499.0,
            "currency": "TRY",
            "limits": {
                "users": 5, "sahalar": 3, "santraller": 5, "storageGB": 2.5,
                "arizaKaydi": 200, "bakimKaydi": 100, "monthlyApiCalls": 5000
            },
            "features": { "exportPdf": true, "apiAccess": false, "support": "email" }
        });

        let plan: Plan = serde_json::from_value(raw).unwrap();

        assert_eq!(plan.limits.sites, 3);
        assert_eq!(plan.limits.plants, 5);
        assert_eq!(plan.limits.fault_records, 200);
        assert_eq!(plan.limits.storage_limit_mb(), 2560);
        assert_eq!(plan.billing_period, "monthly");
        assert!(plan.has_feature("exportPdf"));
        assert!(!plan.has_feature("apiAccess"));
        assert!(!plan.has_feature("support"));
        assert!(!plan.has_feature("missing"));
    }

    #[test]
    fn unlimited_storage_stays_unlimited() {
        let limits = PlanLimits { storage_gb: -1.0, ..Default::default() };
        assert_eq!(limits.storage_limit_mb(), UNLIMITED);
    }
}
