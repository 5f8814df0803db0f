// src/db/stock_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{CreateStockItemPayload, MovementKind, StockItem, StockMovement},
};

const ITEM_COLUMNS: &str = r#"
    id, company_id, site_id, plant_id, name, category, unit, quantity, minimum_quantity,
    maximum_quantity, unit_price, supplier, location, notes, last_movement_at, created_at, updated_at
"#;

const MOVEMENT_COLUMNS: &str = r#"
    id, company_id, stock_item_id, kind, quantity, previous_quantity, new_quantity,
    target_site_id, target_plant_id, description, created_by, created_at
"#;

pub struct NewMovement<'a> {
    pub company_id: Uuid,
    pub stock_item_id: Uuid,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub target_site_id: Option<Uuid>,
    pub target_plant_id: Option<Uuid>,
    pub description: Option<&'a str>,
    pub created_by: Uuid,
}

#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_item(&self, company_id: Uuid, payload: &CreateStockItemPayload) -> Result<StockItem, AppError> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            INSERT INTO stock_items
                (company_id, site_id, plant_id, name, category, unit, quantity, minimum_quantity,
                 maximum_quantity, unit_price, supplier, location, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(payload.site_id)
        .bind(payload.plant_id)
        .bind(&payload.name)
        .bind(&payload.category)
        .bind(&payload.unit)
        .bind(payload.quantity)
        .bind(payload.minimum_quantity)
        .bind(payload.maximum_quantity)
        .bind(payload.unit_price)
        .bind(payload.supplier.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn find_item(&self, company_id: Uuid, id: Uuid) -> Result<Option<StockItem>, AppError> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_items WHERE company_id = $1 AND id = $2"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    // Bloqueia a linha até o fim da transação
    pub async fn lock_item<'e, E>(&self, executor: E, company_id: Uuid, id: Uuid) -> Result<Option<StockItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_items WHERE company_id = $1 AND id = $2 FOR UPDATE"
        ))
        .bind(company_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn list_items(&self, company_id: Uuid) -> Result<Vec<StockItem>, AppError> {
        let items = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_items WHERE company_id = $1 ORDER BY name"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn update_item(&self, item: &StockItem) -> Result<StockItem, AppError> {
        let updated = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_items SET
                name = $3, category = $4, unit = $5, minimum_quantity = $6, maximum_quantity = $7,
                unit_price = $8, supplier = $9, location = $10, notes = $11, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.company_id)
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.unit)
        .bind(item.minimum_quantity)
        .bind(item.maximum_quantity)
        .bind(item.unit_price)
        .bind(item.supplier.as_deref())
        .bind(item.location.as_deref())
        .bind(item.notes.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::RecordNotFound("stock_item"))?;
        Ok(updated)
    }

    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        quantity: Decimal,
        at: DateTime<Utc>,
    ) -> Result<StockItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_items SET quantity = $3, last_movement_at = $4, updated_at = NOW()
            WHERE company_id = $1 AND id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(id)
        .bind(quantity)
        .bind(at)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, company_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM stock_items WHERE company_id = $1 AND id = $2")
            .bind(company_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  MOVIMENTAÇÕES
    // =========================================================================

    pub async fn insert_movement<'e, E>(&self, executor: E, movement: NewMovement<'_>) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            INSERT INTO stock_movements
                (company_id, stock_item_id, kind, quantity, previous_quantity, new_quantity,
                 target_site_id, target_plant_id, description, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MOVEMENT_COLUMNS}
            "#
        ))
        .bind(movement.company_id)
        .bind(movement.stock_item_id)
        .bind(movement.kind)
        .bind(movement.quantity)
        .bind(movement.previous_quantity)
        .bind(movement.new_quantity)
        .bind(movement.target_site_id)
        .bind(movement.target_plant_id)
        .bind(movement.description)
        .bind(movement.created_by)
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    pub async fn list_movements(&self, company_id: Uuid, item_id: Option<Uuid>) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS} FROM stock_movements
            WHERE company_id = $1 AND ($2::uuid IS NULL OR stock_item_id = $2)
            ORDER BY created_at DESC
            LIMIT 500
            "#
        ))
        .bind(company_id)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
