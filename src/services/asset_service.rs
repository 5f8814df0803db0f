// src/services/asset_service.rs

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AssetRepository,
    models::{
        asset::{
            derive_warranty_end, AssetFilter, AssetPage, AssetView, CreateAssetPayload, InventoryAsset,
            UpdateAssetPayload,
        },
        auth::User,
    },
    services::visibility::{Viewer, VisibilityPolicy},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub fn page_size(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Monta a página a partir de `size + 1` linhas; a linha extra só indica `has_more`.
pub fn build_page(mut rows: Vec<InventoryAsset>, size: i64, today: NaiveDate) -> AssetPage {
    let size = size as usize;
    let has_more = rows.len() > size;
    rows.truncate(size);

    let next_cursor = if has_more { rows.last().map(|a| a.created_at) } else { None };
    let items = rows
        .into_iter()
        .map(|asset| AssetView { warranty_state: asset.warranty_state(today), asset })
        .collect();

    AssetPage { items, has_more, next_cursor }
}

fn view(asset: InventoryAsset) -> AssetView {
    AssetView { warranty_state: asset.warranty_state(Utc::now().date_naive()), asset }
}

#[derive(Clone)]
pub struct AssetService {
    repo: AssetRepository,
}

impl AssetService {
    pub fn new(repo: AssetRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user: &User, company_id: Uuid, payload: &CreateAssetPayload) -> Result<AssetView, AppError> {
        let warranty_end = derive_warranty_end(payload.warranty_end, payload.warranty_start, payload.warranty_months);
        let asset = self.repo.create(company_id, user.id, payload, warranty_end).await?;
        Ok(view(asset))
    }

    pub async fn find(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<InventoryAsset, AppError> {
        let asset = self.repo.find(company_id, id).await?.ok_or(AppError::RecordNotFound("asset"))?;
        if !Viewer::from(user).can_see(&asset, VisibilityPolicy::AnyAssigned) {
            return Err(AppError::RecordNotFound("asset"));
        }
        Ok(asset)
    }

    pub async fn get(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<AssetView, AppError> {
        Ok(view(self.find(user, company_id, id).await?))
    }

    /// Página por cursor. Registros fora da visibilidade do usuário são omitidos da página.
    pub async fn list(&self, user: &User, company_id: Uuid, filter: &AssetFilter) -> Result<AssetPage, AppError> {
        let size = page_size(filter.page_size);
        let rows = self.repo.list(company_id, filter, size + 1).await?;

        let mut page = build_page(rows, size, Utc::now().date_naive());
        let viewer = Viewer::from(user);
        page.items.retain(|v| viewer.can_see(&v.asset, VisibilityPolicy::AnyAssigned));
        Ok(page)
    }

    pub async fn update(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateAssetPayload,
    ) -> Result<AssetView, AppError> {
        let mut asset = self.find(user, company_id, id).await?;

        if payload.plant_id.is_some() {
            asset.plant_id = payload.plant_id;
        }
        if let Some(category) = payload.category {
            asset.category = category;
        }
        if payload.brand.is_some() {
            asset.brand = payload.brand.clone();
        }
        if payload.model.is_some() {
            asset.model = payload.model.clone();
        }
        if payload.serial_number.is_some() {
            asset.serial_number = payload.serial_number.clone();
        }
        if let Some(quantity) = payload.quantity {
            asset.quantity = quantity;
        }
        if let Some(status) = payload.status {
            asset.status = status;
        }
        if payload.installed_at.is_some() {
            asset.installed_at = payload.installed_at;
        }
        if payload.warranty_scope.is_some() {
            asset.warranty_scope = payload.warranty_scope.clone();
        }
        if payload.supplier.is_some() {
            asset.supplier = payload.supplier.clone();
        }
        if payload.invoice_no.is_some() {
            asset.invoice_no = payload.invoice_no.clone();
        }
        if payload.location.is_some() {
            asset.location = payload.location.clone();
        }
        if payload.notes.is_some() {
            asset.notes = payload.notes.clone();
        }

        // Início/meses alterados recalculam o fim, salvo fim explícito
        let warranty_changed = payload.warranty_start.is_some() || payload.warranty_months.is_some();
        if payload.warranty_start.is_some() {
            asset.warranty_start = payload.warranty_start;
        }
        if payload.warranty_months.is_some() {
            asset.warranty_months = payload.warranty_months;
        }
        if payload.warranty_end.is_some() {
            asset.warranty_end = payload.warranty_end;
        } else if warranty_changed {
            asset.warranty_end = derive_warranty_end(None, asset.warranty_start, asset.warranty_months);
        }

        Ok(view(self.repo.update(&asset).await?))
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(company_id, id).await? {
            return Err(AppError::RecordNotFound("asset"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::{AssetCategory, AssetStatus, WarrantyState};
    use chrono::Duration;

    fn asset(age_minutes: i64, warranty_end: Option<NaiveDate>) -> InventoryAsset {
        let created = Utc::now() - Duration::minutes(age_minutes);
        InventoryAsset {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            category: AssetCategory::Inverter,
            brand: Some("Huawei".into()),
            model: Some("SUN2000".into()),
            serial_number: Some("HW-001".into()),
            quantity: 1,
            status: AssetStatus::Active,
            installed_at: None,
            warranty_start: None,
            warranty_months: None,
            warranty_end,
            warranty_scope: None,
            supplier: None,
            invoice_no: None,
            location: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(page_size(None), 20);
        assert_eq!(page_size(Some(0)), 1);
        assert_eq!(page_size(Some(5_000)), 100);
    }

    #[test]
    fn extra_row_signals_more_pages() {
        let rows: Vec<_> = (0..3).map(|i| asset(i, None)).collect();
        let expected_cursor = rows[1].created_at;

        let page = build_page(rows, 2, Utc::now().date_naive());
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(expected_cursor));
    }

    #[test]
    fn last_page_has_no_cursor() {
        let rows: Vec<_> = (0..2).map(|i| asset(i, None)).collect();
        let page = build_page(rows, 2, Utc::now().date_naive());
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn page_items_carry_warranty_state() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = vec![
            asset(0, Some(NaiveDate::from_ymd_opt(2024, 6, 20).unwrap())),
            asset(1, Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())),
        ];
        let page = build_page(rows, 20, today);
        assert_eq!(page.items[0].warranty_state, WarrantyState::Expiring);
        assert_eq!(page.items[1].warranty_state, WarrantyState::Expired);
    }
}
