// src/services/stock_service.rs

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{stock_repo::NewMovement, StockRepository},
    models::{
        auth::User,
        stock::{
            CreateStockItemPayload, MovementKind, StockItem, StockItemView, StockMovement,
            StockMovementPayload, UpdateStockItemPayload,
        },
    },
    services::visibility::{filter_visible, Viewer, VisibilityPolicy},
};

/// Nova quantidade após a movimentação. Saída abaixo de zero é rejeitada.
pub fn apply_movement(kind: MovementKind, current: Decimal, quantity: Decimal) -> Result<Decimal, AppError> {
    match kind {
        MovementKind::In => Ok(current + quantity),
        MovementKind::Out => {
            let next = current - quantity;
            if next < Decimal::ZERO {
                return Err(AppError::NegativeStock);
            }
            Ok(next)
        }
        MovementKind::Count => Ok(quantity),
        MovementKind::Transfer => Ok(current),
    }
}

/// Item fora das sahalar/santraller do usuário se comporta como inexistente.
pub fn ensure_visible(viewer: &Viewer<'_>, item: &StockItem) -> Result<(), AppError> {
    if viewer.can_see(item, VisibilityPolicy::AnyAssigned) {
        Ok(())
    } else {
        Err(AppError::RecordNotFound("stock_item"))
    }
}

/// Mantém só as movimentações de itens visíveis.
pub fn visible_movements(movements: Vec<StockMovement>, visible_items: &HashSet<Uuid>) -> Vec<StockMovement> {
    movements
        .into_iter()
        .filter(|m| visible_items.contains(&m.stock_item_id))
        .collect()
}

#[derive(Clone)]
pub struct StockService {
    repo: StockRepository,
    pool: PgPool,
}

impl StockService {
    pub fn new(repo: StockRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_item(&self, company_id: Uuid, payload: &CreateStockItemPayload) -> Result<StockItemView, AppError> {
        Ok(self.repo.create_item(company_id, payload).await?.into())
    }

    async fn find_visible(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<StockItem, AppError> {
        let item = self
            .repo
            .find_item(company_id, id)
            .await?
            .ok_or(AppError::RecordNotFound("stock_item"))?;
        ensure_visible(&Viewer::from(user), &item)?;
        Ok(item)
    }

    pub async fn get_item(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<StockItemView, AppError> {
        Ok(self.find_visible(user, company_id, id).await?.into())
    }

    pub async fn list_items(&self, user: &User, company_id: Uuid) -> Result<Vec<StockItemView>, AppError> {
        let items = self.repo.list_items(company_id).await?;
        Ok(filter_visible(items, &Viewer::from(user), VisibilityPolicy::AnyAssigned)
            .into_iter()
            .map(StockItemView::from)
            .collect())
    }

    pub async fn update_item(
        &self,
        user: &User,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateStockItemPayload,
    ) -> Result<StockItemView, AppError> {
        let mut item = self.find_visible(user, company_id, id).await?;

        if let Some(name) = &payload.name {
            item.name = name.clone();
        }
        if let Some(category) = &payload.category {
            item.category = category.clone();
        }
        if let Some(unit) = &payload.unit {
            item.unit = unit.clone();
        }
        if let Some(min) = payload.minimum_quantity {
            item.minimum_quantity = min;
        }
        if payload.maximum_quantity.is_some() {
            item.maximum_quantity = payload.maximum_quantity;
        }
        if payload.unit_price.is_some() {
            item.unit_price = payload.unit_price;
        }
        if payload.supplier.is_some() {
            item.supplier = payload.supplier.clone();
        }
        if payload.location.is_some() {
            item.location = payload.location.clone();
        }
        if payload.notes.is_some() {
            item.notes = payload.notes.clone();
        }

        Ok(self.repo.update_item(&item).await?.into())
    }

    pub async fn delete_item(&self, user: &User, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.find_visible(user, company_id, id).await?;
        if !self.repo.delete_item(company_id, id).await? {
            return Err(AppError::RecordNotFound("stock_item"));
        }
        Ok(())
    }

    /// Trava o item, aplica a movimentação e registra o histórico na mesma transação.
    pub async fn record_movement(
        &self,
        user: &User,
        company_id: Uuid,
        item_id: Uuid,
        payload: &StockMovementPayload,
    ) -> Result<StockMovement, AppError> {
        let mut tx = self.pool.begin().await?;

        let item = self
            .repo
            .lock_item(&mut *tx, company_id, item_id)
            .await?
            .ok_or(AppError::RecordNotFound("stock_item"))?;
        // Rollback implícito: a transação é descartada sem commit
        ensure_visible(&Viewer::from(user), &item)?;

        let new_quantity = apply_movement(payload.kind, item.quantity, payload.quantity)?;
        let now = Utc::now();
        self.repo.set_quantity(&mut *tx, company_id, item_id, new_quantity, now).await?;

        let movement = self
            .repo
            .insert_movement(
                &mut *tx,
                NewMovement {
                    company_id,
                    stock_item_id: item_id,
                    kind: payload.kind,
                    quantity: payload.quantity,
                    previous_quantity: item.quantity,
                    new_quantity,
                    target_site_id: payload.target_site_id,
                    target_plant_id: payload.target_plant_id,
                    description: payload.description.as_deref(),
                    created_by: user.id,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::debug!(
            "📦 Movimentação {:?} em '{}': {} → {}",
            payload.kind,
            item.name,
            item.quantity,
            new_quantity
        );
        Ok(movement)
    }

    /// Histórico de um item (se visível) ou da empresa, restrito aos itens visíveis.
    pub async fn movements(
        &self,
        user: &User,
        company_id: Uuid,
        item_id: Option<Uuid>,
    ) -> Result<Vec<StockMovement>, AppError> {
        if let Some(id) = item_id {
            self.find_visible(user, company_id, id).await?;
            return self.repo.list_movements(company_id, Some(id)).await;
        }

        let movements = self.repo.list_movements(company_id, None).await?;
        if !user.role.is_restricted() {
            return Ok(movements);
        }

        let viewer = Viewer::from(user);
        let visible: HashSet<Uuid> = self
            .repo
            .list_items(company_id)
            .await?
            .iter()
            .filter(|item| viewer.can_see(*item, VisibilityPolicy::AnyAssigned))
            .map(|item| item.id)
            .collect();
        Ok(visible_movements(movements, &visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::auth::Role;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn item_at(site_id: Option<Uuid>) -> StockItem {
        let now = Utc::now();
        StockItem {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id,
            plant_id: None,
            name: "MC4 konnektör".into(),
            category: "elektrik".into(),
            unit: "adet".into(),
            quantity: d(10),
            minimum_quantity: d(2),
            maximum_quantity: None,
            unit_price: None,
            supplier: None,
            location: None,
            notes: None,
            last_movement_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn movement_of(stock_item_id: Uuid) -> StockMovement {
        StockMovement {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            stock_item_id,
            kind: MovementKind::Out,
            quantity: d(1),
            previous_quantity: d(10),
            new_quantity: d(9),
            target_site_id: None,
            target_plant_id: None,
            description: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn items_outside_assigned_sites_are_not_found() {
        let (site_a, site_b) = (Uuid::new_v4(), Uuid::new_v4());
        let sites = [site_a];
        let technician = Viewer { role: Role::Technician, sites: &sites, plants: &[] };

        assert!(ensure_visible(&technician, &item_at(Some(site_a))).is_ok());
        assert!(matches!(
            ensure_visible(&technician, &item_at(Some(site_b))),
            Err(AppError::RecordNotFound("stock_item"))
        ));

        let manager = Viewer { role: Role::Manager, sites: &[], plants: &[] };
        assert!(ensure_visible(&manager, &item_at(Some(site_b))).is_ok());
    }

    #[test]
    fn movement_history_keeps_only_visible_items() {
        let (seen, hidden) = (Uuid::new_v4(), Uuid::new_v4());
        let visible: HashSet<Uuid> = [seen].into_iter().collect();

        let kept = visible_movements(vec![movement_of(seen), movement_of(hidden), movement_of(seen)], &visible);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|m| m.stock_item_id == seen));
    }

    #[test]
    fn in_and_out_adjust_quantity() {
        assert_eq!(apply_movement(MovementKind::In, d(10), d(5)).unwrap(), d(15));
        assert_eq!(apply_movement(MovementKind::Out, d(10), d(10)).unwrap(), d(0));
    }

    #[test]
    fn out_below_zero_is_rejected() {
        assert!(matches!(
            apply_movement(MovementKind::Out, d(3), d(4)),
            Err(AppError::NegativeStock)
        ));
    }

    #[test]
    fn count_sets_and_transfer_keeps_quantity() {
        assert_eq!(apply_movement(MovementKind::Count, d(10), d(7)).unwrap(), d(7));
        assert_eq!(apply_movement(MovementKind::Transfer, d(10), d(4)).unwrap(), d(10));
    }
}
