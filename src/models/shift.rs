// src/models/shift.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shift_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Noon,
    Evening,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shift_condition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShiftCondition {
    Normal,
    Attention,
    Emergency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShiftMember {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShiftObservation {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: ObservationPriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherConditions {
    pub temperature_c: Option<f64>,
    pub summary: Option<String>,
    pub wind_speed_kmh: Option<f64>,
}

// Rondas de segurança do bekçi
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityChecks {
    pub cameras: bool,
    pub fence: bool,
    pub lighting: bool,
    pub entrance: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentChecks {
    pub panel_cleaning: bool,
    pub inverter: bool,
    pub cabling: bool,
    pub grounding: bool,
    pub notes: Option<String>,
}

/// Vardiya bildirimi: relatório de um turno numa saha.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    pub id: Uuid,
    pub company_id: Uuid,
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub shift_date: DateTime<Utc>,
    pub shift_type: ShiftType,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub personnel: Json<Vec<ShiftMember>>,
    pub condition: ShiftCondition,
    pub emergency: bool,
    pub observations: Json<Vec<ShiftObservation>>,
    pub tasks_done: Vec<String>,
    pub photos: Vec<String>,
    pub location: Option<Json<GeoPoint>>,
    pub weather: Option<Json<WeatherConditions>>,
    pub security_checks: Option<Json<SecurityChecks>>,
    pub equipment_checks: Option<Json<EquipmentChecks>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftReport {
    pub fn is_urgent(&self) -> bool {
        self.emergency || self.condition == ShiftCondition::Emergency
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftPayload {
    pub site_id: Uuid,
    pub plant_id: Option<Uuid>,
    pub shift_date: DateTime<Utc>,
    pub shift_type: ShiftType,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    #[serde(default)]
    #[validate(nested)]
    pub personnel: Vec<ShiftMember>,
    #[serde(default = "normal_condition")]
    pub condition: ShiftCondition,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default)]
    #[validate(nested)]
    pub observations: Vec<ShiftObservation>,
    #[serde(default)]
    pub tasks_done: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub location: Option<GeoPoint>,
    pub weather: Option<WeatherConditions>,
    pub security_checks: Option<SecurityChecks>,
    pub equipment_checks: Option<EquipmentChecks>,
}

fn normal_condition() -> ShiftCondition {
    ShiftCondition::Normal
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftPayload {
    pub shift_type: Option<ShiftType>,
    pub starts_at: Option<NaiveTime>,
    pub ends_at: Option<NaiveTime>,
    #[validate(nested)]
    pub personnel: Option<Vec<ShiftMember>>,
    pub condition: Option<ShiftCondition>,
    pub emergency: Option<bool>,
    #[validate(nested)]
    pub observations: Option<Vec<ShiftObservation>>,
    pub tasks_done: Option<Vec<String>>,
    // Fotos novas são anexadas às existentes
    #[serde(default)]
    pub photos: Vec<String>,
    pub location: Option<GeoPoint>,
    pub weather: Option<WeatherConditions>,
    pub security_checks: Option<SecurityChecks>,
    pub equipment_checks: Option<EquipmentChecks>,
}

/// `to` é exclusivo.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftFilter {
    pub site_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub urgent_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_payload_accepts_short_clock_times_and_defaults() {
        let payload: CreateShiftPayload = serde_json::from_value(json!({
            "siteId": Uuid::nil(),
            "shiftDate": "2025-06-01T00:00:00Z",
            "shiftType": "night",
            "startsAt": "22:00",
            "endsAt": "06:00",
            "securityChecks": { "cameras": true }
        }))
        .unwrap();

        assert_eq!(payload.starts_at, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(payload.condition, ShiftCondition::Normal);
        assert!(!payload.emergency);
        let checks = payload.security_checks.unwrap();
        assert!(checks.cameras && !checks.fence);
    }

    #[test]
    fn unnamed_personnel_fails_validation() {
        let payload = UpdateShiftPayload {
            personnel: Some(vec![ShiftMember { user_id: None, name: String::new(), role: None, phone: None }]),
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }
}
