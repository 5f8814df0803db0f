// src/models/asset.rs

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const WARRANTY_EXPIRING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Panel,
    Inverter,
    Transformer,
    AcPanel,
    DcPanel,
    Meter,
    Cable,
    Mounting,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    Faulty,
    Replaced,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyState {
    None,
    Active,
    Expiring,
    Expired,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAsset {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub category: AssetCategory,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub quantity: i32,
    pub status: AssetStatus,
    pub installed_at: Option<NaiveDate>,
    pub warranty_start: Option<NaiveDate>,
    pub warranty_months: Option<i32>,
    pub warranty_end: Option<NaiveDate>,
    pub warranty_scope: Option<String>,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryAsset {
    pub fn warranty_state(&self, today: NaiveDate) -> WarrantyState {
        match self.warranty_end {
            None => WarrantyState::None,
            Some(end) if end < today => WarrantyState::Expired,
            Some(end) if (end - today).num_days() <= WARRANTY_EXPIRING_DAYS => WarrantyState::Expiring,
            Some(_) => WarrantyState::Active,
        }
    }
}

/// Fim da garantia: o informado, ou início + meses.
pub fn derive_warranty_end(
    explicit_end: Option<NaiveDate>,
    start: Option<NaiveDate>,
    months: Option<i32>,
) -> Option<NaiveDate> {
    if explicit_end.is_some() {
        return explicit_end;
    }
    let (start, months) = (start?, months?);
    u32::try_from(months).ok().and_then(|m| start.checked_add_months(Months::new(m)))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: InventoryAsset,
    pub warranty_state: WarrantyState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPage {
    pub items: Vec<AssetView>,
    pub has_more: bool,
    pub next_cursor: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetPayload {
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub category: AssetCategory,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    #[validate(range(min = 1, message = "must_be_positive"))]
    pub quantity: Option<i32>,
    pub status: Option<AssetStatus>,
    pub installed_at: Option<NaiveDate>,
    pub warranty_start: Option<NaiveDate>,
    #[validate(range(min = 0, max = 600, message = "invalid_months"))]
    pub warranty_months: Option<i32>,
    pub warranty_end: Option<NaiveDate>,
    pub warranty_scope: Option<String>,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetPayload {
    pub plant_id: Option<Uuid>,
    pub category: Option<AssetCategory>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    #[validate(range(min = 1, message = "must_be_positive"))]
    pub quantity: Option<i32>,
    pub status: Option<AssetStatus>,
    pub installed_at: Option<NaiveDate>,
    pub warranty_start: Option<NaiveDate>,
    #[validate(range(min = 0, max = 600, message = "invalid_months"))]
    pub warranty_months: Option<i32>,
    pub warranty_end: Option<NaiveDate>,
    pub warranty_scope: Option<String>,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFilter {
    pub category: Option<AssetCategory>,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub search: Option<String>,
    pub page_size: Option<i64>,
    pub before: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asset_with_end(end: Option<NaiveDate>) -> InventoryAsset {
        InventoryAsset {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            category: AssetCategory::Inverter,
            brand: Some("Huawei".into()),
            model: Some("SUN2000-100KTL".into()),
            serial_number: Some("HW123".into()),
            quantity: 1,
            status: AssetStatus::Active,
            installed_at: None,
            warranty_start: None,
            warranty_months: None,
            warranty_end: end,
            warranty_scope: None,
            supplier: None,
            invoice_no: None,
            location: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn warranty_states() {
        let today = date(2024, 6, 1);
        assert_eq!(asset_with_end(None).warranty_state(today), WarrantyState::None);
        assert_eq!(asset_with_end(Some(date(2024, 5, 31))).warranty_state(today), WarrantyState::Expired);
        assert_eq!(asset_with_end(Some(date(2024, 6, 1))).warranty_state(today), WarrantyState::Expiring);
        assert_eq!(asset_with_end(Some(date(2024, 7, 1))).warranty_state(today), WarrantyState::Expiring);
        assert_eq!(asset_with_end(Some(date(2024, 7, 2))).warranty_state(today), WarrantyState::Active);
    }

    #[test]
    fn warranty_end_is_derived_from_start_and_months() {
        assert_eq!(derive_warranty_end(None, Some(date(2023, 1, 31)), Some(24)), Some(date(2025, 1, 31)));
        assert_eq!(derive_warranty_end(None, Some(date(2024, 1, 31)), Some(1)), Some(date(2024, 2, 29)));
        assert_eq!(
            derive_warranty_end(Some(date(2030, 1, 1)), Some(date(2023, 1, 1)), Some(12)),
            Some(date(2030, 1, 1))
        );
        assert_eq!(derive_warranty_end(None, None, Some(12)), None);
    }
}
