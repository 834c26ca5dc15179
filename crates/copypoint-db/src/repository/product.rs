//! # Product Repository
//!
//! Catalog access. The sale engine reads products through here; stock
//! mutation at sale time happens inside the engine's transaction, not
//! through this repository.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use copypoint_core::{Product, ProductKind};

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

/// Maps a database row to a Product, field by field.
fn map_product(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        barcode: row.try_get("barcode")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        kind: row.try_get("kind")?,
        base_cost_cents: row.try_get("base_cost_cents")?,
        stock: row.try_get("stock")?,
        is_active: row.try_get("is_active")?,
    })
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Finds a product by its rowid.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Product> {
        let row = sqlx::query(
            "SELECT id, category_id, barcode, sku, name, kind, base_cost_cents, stock, is_active
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("product", id))?;

        Ok(map_product(&row)?)
    }

    /// Finds an active product by SKU or barcode (cashier scan/type path).
    pub async fn find_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        debug!(code, "Looking up product by code");

        let row = sqlx::query(
            "SELECT id, category_id, barcode, sku, name, kind, base_cost_cents, stock, is_active
             FROM products
             WHERE (sku = ? OR barcode = ?) AND is_active = 1",
        )
        .bind(code)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_product).transpose().map_err(Into::into)
    }

    /// Lists all active products, optionally filtered by kind.
    pub async fn list_active(&self, kind: Option<ProductKind>) -> DbResult<Vec<Product>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(
                    "SELECT id, category_id, barcode, sku, name, kind, base_cost_cents, stock, is_active
                     FROM products WHERE is_active = 1 AND kind = ? ORDER BY name",
                )
                .bind(kind)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, category_id, barcode, sku, name, kind, base_cost_cents, stock, is_active
                     FROM products WHERE is_active = 1 ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(map_product).collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Inserts a new product and returns it with the assigned id.
    pub async fn insert(&self, mut product: Product) -> DbResult<Product> {
        let result = sqlx::query(
            "INSERT INTO products (category_id, barcode, sku, name, kind, base_cost_cents, stock, is_active)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(product.category_id)
        .bind(&product.barcode)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.base_cost_cents)
        .bind(product.stock)
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        product.id = result.last_insert_rowid();
        debug!(id = product.id, sku = %product.sku, "Product inserted");
        Ok(product)
    }

    /// Adjusts stock by a signed delta (receiving goods, manual correction).
    /// Sale-time decrements go through the engine's transaction instead.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET stock = stock + ? WHERE id = ? AND kind = 'physical'",
        )
        .bind(delta)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("physical product", id));
        }
        Ok(())
    }

    /// Deactivates a product (soft delete).
    pub async fn deactivate(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }
        Ok(())
    }

    /// Returns the total product count (diagnostics, seed checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
