// src/models/stock.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Critical,
    Low,
    Normal,
    Excess,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub minimum_quantity: Decimal,
    pub maximum_quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub last_movement_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    pub fn status(&self) -> StockStatus {
        if self.quantity <= Decimal::ZERO {
            StockStatus::Critical
        } else if self.quantity <= self.minimum_quantity {
            StockStatus::Low
        } else if self
            .maximum_quantity
            .is_some_and(|max| max > Decimal::ZERO && self.quantity >= max)
        {
            StockStatus::Excess
        } else {
            StockStatus::Normal
        }
    }
}

// Item + status calculado na leitura
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemView {
    #[serde(flatten)]
    pub item: StockItem,
    pub status: StockStatus,
}

impl From<StockItem> for StockItemView {
    fn from(item: StockItem) -> Self {
        let status = item.status();
        Self { item, status }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    In,
    Out,
    Transfer,
    Count,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub company_id: Uuid,
    pub stock_item_id: Uuid,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub target_site_id: Option<Uuid>,
    pub target_plant_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockItemPayload {
    pub site_id: Option<Uuid>,
    pub plant_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(length(min = 1, message = "required"))]
    pub category: String,
    #[validate(length(min = 1, message = "required"))]
    pub unit: String,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub quantity: Decimal,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub minimum_quantity: Decimal,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub maximum_quantity: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub unit_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

// A quantidade só muda via movimentação
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockItemPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub minimum_quantity: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub maximum_quantity: Option<Decimal>,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub unit_price: Option<Decimal>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementPayload {
    pub kind: MovementKind,
    #[validate(custom(function = "crate::models::validate_non_negative"))]
    pub quantity: Decimal,
    pub target_site_id: Option<Uuid>,
    pub target_plant_id: Option<Uuid>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, min: i64, max: Option<i64>) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: None,
            plant_id: None,
            name: "MC4 konnektör".into(),
            category: "elektrik".into(),
            unit: "adet".into(),
            quantity: Decimal::from(quantity),
            minimum_quantity: Decimal::from(min),
            maximum_quantity: max.map(Decimal::from),
            unit_price: None,
            supplier: None,
            location: None,
            notes: None,
            last_movement_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(item(0, 5, None).status(), StockStatus::Critical);
        assert_eq!(item(5, 5, None).status(), StockStatus::Low);
        assert_eq!(item(6, 5, None).status(), StockStatus::Normal);
        assert_eq!(item(50, 5, Some(50)).status(), StockStatus::Excess);
        assert_eq!(item(49, 5, Some(50)).status(), StockStatus::Normal);
    }

    #[test]
    fn zero_maximum_means_no_ceiling() {
        assert_eq!(item(10, 5, Some(0)).status(), StockStatus::Normal);
    }

    #[test]
    fn critical_wins_over_excess() {
        assert_eq!(item(0, 0, Some(0)).status(), StockStatus::Critical);
    }
}
