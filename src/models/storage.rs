// src/models/storage.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::format::{bytes_to_mb, round2};

pub const DEFAULT_STORAGE_LIMIT_MB: i64 = 5120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum StorageCategory {
    Logos,
    FaultPhotos,
    MaintenancePhotos,
    ShiftPhotos,
    Documents,
    Other,
}

impl StorageCategory {
    // Ordem importa: a primeira correspondência vence
    const RULES: &'static [(&'static [&'static str], StorageCategory)] = &[
        (&["/logo"], StorageCategory::Logos),
        (&["/ariza", "/fault"], StorageCategory::FaultPhotos),
        (&["/bakim", "/maintenance"], StorageCategory::MaintenancePhotos),
        (&["/vardiya", "/shift"], StorageCategory::ShiftPhotos),
        (&["/document", "/belge"], StorageCategory::Documents),
    ];

    pub fn from_path(path: &str) -> Self {
        let path = path.to_lowercase();
        Self::RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| path.contains(n)))
            .map(|(_, category)| *category)
            .unwrap_or(StorageCategory::Other)
    }

    /// Chave usada no JSONB `breakdown`.
    pub fn key(self) -> &'static str {
        match self {
            StorageCategory::Logos => "logos",
            StorageCategory::FaultPhotos => "faultPhotos",
            StorageCategory::MaintenancePhotos => "maintenancePhotos",
            StorageCategory::ShiftPhotos => "shiftPhotos",
            StorageCategory::Documents => "documents",
            StorageCategory::Other => "other",
        }
    }
}

/// Bytes por categoria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    #[serde(default)]
    pub logos: i64,
    #[serde(default, alias = "arizaPhotos")]
    pub fault_photos: i64,
    #[serde(default, alias = "bakimPhotos")]
    pub maintenance_photos: i64,
    #[serde(default, alias = "vardiyaPhotos")]
    pub shift_photos: i64,
    #[serde(default)]
    pub documents: i64,
    #[serde(default)]
    pub other: i64,
}

impl Breakdown {
    pub fn slot(&mut self, category: StorageCategory) -> &mut i64 {
        match category {
            StorageCategory::Logos => &mut self.logos,
            StorageCategory::FaultPhotos => &mut self.fault_photos,
            StorageCategory::MaintenancePhotos => &mut self.maintenance_photos,
            StorageCategory::ShiftPhotos => &mut self.shift_photos,
            StorageCategory::Documents => &mut self.documents,
            StorageCategory::Other => &mut self.other,
        }
    }

    pub fn total(&self) -> i64 {
        self.logos + self.fault_photos + self.maintenance_photos + self.shift_photos + self.documents + self.other
    }
}

/// Variação incremental aplicada aos contadores após um upload/remoção.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageDelta {
    pub category: StorageCategory,
    pub bytes: i64,
    pub files: i64,
}

impl UsageDelta {
    pub fn upload(path: &str, size: u64) -> Self {
        Self {
            category: StorageCategory::from_path(path),
            bytes: size as i64,
            files: 1,
        }
    }

    pub fn delete(path: &str, size: u64) -> Self {
        Self {
            category: StorageCategory::from_path(path),
            bytes: -(size as i64),
            files: -1,
        }
    }
}

/// Contadores de uso de uma empresa, em bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageUsage {
    pub used_bytes: i64,
    pub file_count: i64,
    pub breakdown: Breakdown,
}

impl StorageUsage {
    pub fn apply(&mut self, delta: &UsageDelta) {
        self.used_bytes += delta.bytes;
        self.file_count += delta.files;
        *self.breakdown.slot(delta.category) += delta.bytes;
    }

    /// Recontagem a partir da listagem completa dos objetos.
    pub fn recount<'a>(objects: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut usage = Self::default();
        for (path, size) in objects {
            usage.apply(&UsageDelta::upload(path, size));
        }
        usage
    }
}

// Linha de `company_storage_metrics`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StorageMetricsRow {
    pub company_id: Uuid,
    pub storage_used_bytes: i64,
    pub file_count: i64,
    pub breakdown: Json<Breakdown>,
    pub is_recount: bool,
    pub last_calculated: DateTime<Utc>,
}

impl StorageMetricsRow {
    pub fn usage(&self) -> StorageUsage {
        StorageUsage {
            used_bytes: self.storage_used_bytes,
            file_count: self.file_count,
            breakdown: self.breakdown.0.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    Notice,
    Warning,
    Full,
}

impl WarningLevel {
    pub fn for_percentage(percentage: f64) -> Option<Self> {
        if percentage >= 100.0 {
            Some(WarningLevel::Full)
        } else if percentage >= 90.0 {
            Some(WarningLevel::Warning)
        } else if percentage >= 80.0 {
            Some(WarningLevel::Notice)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub used_mb: f64,
    /// `-1` quando ilimitado
    pub limit_mb: i64,
    pub percentage: f64,
    pub is_over_limit: bool,
    pub warning: Option<WarningLevel>,
    pub file_count: i64,
    pub breakdown_mb: BreakdownMb,
    pub is_recount: bool,
    pub last_calculated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownMb {
    pub logos: f64,
    pub fault_photos: f64,
    pub maintenance_photos: f64,
    pub shift_photos: f64,
    pub documents: f64,
    pub other: f64,
}

impl From<&Breakdown> for BreakdownMb {
    fn from(b: &Breakdown) -> Self {
        Self {
            logos: bytes_to_mb(b.logos),
            fault_photos: bytes_to_mb(b.fault_photos),
            maintenance_photos: bytes_to_mb(b.maintenance_photos),
            shift_photos: bytes_to_mb(b.shift_photos),
            documents: bytes_to_mb(b.documents),
            other: bytes_to_mb(b.other),
        }
    }
}

impl StorageStatus {
    pub fn new(usage: &StorageUsage, limit_mb: i64) -> Self {
        let used_mb = bytes_to_mb(usage.used_bytes);
        let (percentage, is_over_limit) = match limit_mb {
            -1 => (0.0, false),
            0 => (if usage.used_bytes > 0 { 100.0 } else { 0.0 }, usage.used_bytes > 0),
            limit => (round2(used_mb / limit as f64 * 100.0), used_mb > limit as f64),
        };
        Self {
            used_mb,
            limit_mb,
            percentage,
            is_over_limit,
            warning: WarningLevel::for_percentage(percentage),
            file_count: usage.file_count,
            breakdown_mb: BreakdownMb::from(&usage.breakdown),
            is_recount: false,
            last_calculated: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub key: String,
    pub size: u64,
    pub category: StorageCategory,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecountSummary {
    pub companies: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_first_matching_rule() {
        assert_eq!(StorageCategory::from_path("companies/x/logo/main.png"), StorageCategory::Logos);
        assert_eq!(StorageCategory::from_path("companies/x/ariza/1.jpg"), StorageCategory::FaultPhotos);
        assert_eq!(StorageCategory::from_path("companies/x/Faults/1.jpg"), StorageCategory::FaultPhotos);
        assert_eq!(StorageCategory::from_path("companies/x/bakim/a.jpg"), StorageCategory::MaintenancePhotos);
        assert_eq!(StorageCategory::from_path("companies/x/shift/a.jpg"), StorageCategory::ShiftPhotos);
        assert_eq!(StorageCategory::from_path("companies/x/belge/a.pdf"), StorageCategory::Documents);
        assert_eq!(StorageCategory::from_path("companies/x/misc/a.bin"), StorageCategory::Other);
        // logo vence mesmo dentro de pasta de arıza
        assert_eq!(StorageCategory::from_path("companies/x/ariza/logo.png"), StorageCategory::Logos);
    }

    #[test]
    fn incremental_and_recount_agree() {
        let files = [
            ("companies/c/logo/l.png", 2_000u64),
            ("companies/c/ariza/a1.jpg", 350_000),
            ("companies/c/ariza/a2.jpg", 410_000),
            ("companies/c/bakim/b1.jpg", 90_000),
            ("companies/c/documents/contract.pdf", 1_200_000),
        ];

        let mut incremental = StorageUsage::default();
        for (path, size) in files {
            incremental.apply(&UsageDelta::upload(path, size));
        }
        incremental.apply(&UsageDelta::delete(files[1].0, files[1].1));

        let remaining = files.iter().enumerate().filter(|(i, _)| *i != 1).map(|(_, f)| *f);
        let recount = StorageUsage::recount(remaining);

        assert_eq!(incremental, recount);
        assert_eq!(recount.file_count, 4);
        assert_eq!(recount.breakdown.fault_photos, 410_000);
        assert_eq!(recount.breakdown.total(), recount.used_bytes);
    }

    #[test]
    fn status_percentages_and_warnings() {
        let usage = StorageUsage { used_bytes: 900 * 1024 * 1024, file_count: 3, ..Default::default() };

        let status = StorageStatus::new(&usage, 1000);
        assert_eq!(status.percentage, 90.0);
        assert_eq!(status.warning, Some(WarningLevel::Warning));
        assert!(!status.is_over_limit);

        let full = StorageStatus::new(&usage, 900);
        assert_eq!(full.warning, Some(WarningLevel::Full));
        assert!(!full.is_over_limit);

        let over = StorageStatus::new(&usage, 800);
        assert!(over.is_over_limit);

        let unlimited = StorageStatus::new(&usage, -1);
        assert_eq!(unlimited.percentage, 0.0);
        assert_eq!(unlimited.warning, None);
    }

    #[test]
    fn legacy_breakdown_keys_are_read() {
        let b: Breakdown = serde_json::from_str(r#"{"logos":1,"arizaPhotos":2,"bakimPhotos":3,"vardiyaPhotos":4}"#).unwrap();
        assert_eq!(b.fault_photos, 2);
        assert_eq!(b.maintenance_photos, 3);
        assert_eq!(b.shift_photos, 4);
    }
}
