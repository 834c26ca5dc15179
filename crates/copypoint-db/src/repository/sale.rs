//! # Sale Repository
//!
//! Persistence for sale headers and lines.
//!
//! The `*_tx` methods take an open transaction connection: the engine
//! owns the transaction boundary, and this repository only knows how to
//! read and write rows inside it. Reads go through the pool directly.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use copypoint_core::{Sale, SaleLine};

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

fn map_sale_header(row: &SqliteRow) -> Result<Sale, sqlx::Error> {
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(Sale {
        id: row.try_get("id")?,
        created_at,
        total_cents: row.try_get("total_cents")?,
        payment_method: row.try_get("payment_method")?,
        status: row.try_get("status")?,
        customer_id: row.try_get("customer_id")?,
        tax_id_snapshot: row.try_get("tax_id_snapshot")?,
        invoice_requested: row.try_get("invoice_requested")?,
        fiscal_status: row.try_get("fiscal_status")?,
        invoice_auth_code: row.try_get("invoice_auth_code")?,
        invoice_auth_expiry: row.try_get("invoice_auth_expiry")?,
        pos_number: row.try_get("pos_number")?,
        invoice_number: row.try_get("invoice_number")?,
        lines: Vec::new(),
    })
}

fn map_sale_line(row: &SqliteRow) -> Result<SaleLine, sqlx::Error> {
    Ok(SaleLine {
        id: row.try_get("id")?,
        sale_id: row.try_get("sale_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
        unit_price_cents: row.try_get("unit_price_cents")?,
        subtotal_cents: row.try_get("subtotal_cents")?,
        description: row.try_get("description")?,
    })
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts the sale header inside the engine's transaction and
    /// returns the assigned id.
    pub async fn insert_header_tx(&self, conn: &mut SqliteConnection, sale: &Sale) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO sales (created_at, total_cents, payment_method, status,
                                customer_id, tax_id_snapshot, invoice_requested, fiscal_status,
                                invoice_auth_code, invoice_auth_expiry, pos_number, invoice_number)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(sale.created_at)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(sale.status)
        .bind(sale.customer_id)
        .bind(&sale.tax_id_snapshot)
        .bind(sale.invoice_requested)
        .bind(sale.fiscal_status)
        .bind(&sale.invoice_auth_code)
        .bind(sale.invoice_auth_expiry)
        .bind(sale.pos_number)
        .bind(sale.invoice_number)
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts one sale line inside the engine's transaction and returns
    /// the assigned line id. Lines are inserted in cart order, so rowid
    /// order is insertion order.
    pub async fn insert_line_tx(&self, conn: &mut SqliteConnection, line: &SaleLine) -> DbResult<i64> {
        let result = sqlx::query(
            "INSERT INTO sale_lines (sale_id, product_id, quantity, unit_price_cents,
                                     subtotal_cents, description)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(line.sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.subtotal_cents)
        .bind(&line.description)
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Decrements stock for a physical product inside the engine's
    /// transaction. The kind guard makes the update a no-op if the row
    /// turns out to be a service; stock may go negative (oversell is a
    /// reporting concern, not a blocking one).
    pub async fn decrement_stock_tx(
        &self,
        conn: &mut SqliteConnection,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<()> {
        sqlx::query("UPDATE products SET stock = stock - ? WHERE id = ? AND kind = 'physical'")
            .bind(quantity)
            .bind(product_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Loads a sale with its lines in insertion order.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Sale> {
        let row = sqlx::query(
            "SELECT id, created_at, total_cents, payment_method, status,
                    customer_id, tax_id_snapshot, invoice_requested, fiscal_status,
                    invoice_auth_code, invoice_auth_expiry, pos_number, invoice_number
             FROM sales WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("sale", id))?;

        let mut sale = map_sale_header(&row)?;

        let line_rows = sqlx::query(
            "SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents, description
             FROM sale_lines WHERE sale_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        sale.lines = line_rows
            .iter()
            .map(map_sale_line)
            .collect::<Result<_, _>>()?;

        debug!(sale_id = id, lines = sale.lines.len(), "Sale loaded");
        Ok(sale)
    }

    /// Lists sale headers for a day, newest first, without lines.
    pub async fn list_for_day(&self, day: chrono::NaiveDate) -> DbResult<Vec<Sale>> {
        let start = format!("{day}T00:00:00");
        let end = format!("{day}T23:59:59.999999999");

        let rows = sqlx::query(
            "SELECT id, created_at, total_cents, payment_method, status,
                    customer_id, tax_id_snapshot, invoice_requested, fiscal_status,
                    invoice_auth_code, invoice_auth_expiry, pos_number, invoice_number
             FROM sales
             WHERE created_at >= ? AND created_at <= ?
             ORDER BY created_at DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_sale_header).collect::<Result<_, _>>().map_err(Into::into)
    }

    /// Total number of sales (diagnostics, atomicity tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use copypoint_core::{FiscalStatus, PaymentMethod, SaleStatus};

    fn bare_sale(created_at: DateTime<Utc>, total_cents: i64) -> Sale {
        Sale {
            id: 0,
            created_at,
            total_cents,
            payment_method: PaymentMethod::Cash,
            status: SaleStatus::Completed,
            customer_id: None,
            tax_id_snapshot: None,
            invoice_requested: false,
            fiscal_status: FiscalStatus::NotRequired,
            invoice_auth_code: None,
            invoice_auth_expiry: None,
            pos_number: None,
            invoice_number: None,
            lines: Vec::new(),
        }
    }

    // The day filter compares stored timestamps as strings, so this
    // pins the boundary: a sale from today is listed, yesterday's is
    // not, and vice versa.
    #[tokio::test]
    async fn test_list_for_day_respects_day_boundaries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.sales();

        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        let mut tx = db.pool().begin().await.unwrap();
        let today_id = repo.insert_header_tx(&mut tx, &bare_sale(now, 100)).await.unwrap();
        let yesterday_id =
            repo.insert_header_tx(&mut tx, &bare_sale(yesterday, 200)).await.unwrap();
        tx.commit().await.unwrap();

        let todays = repo.list_for_day(now.date_naive()).await.unwrap();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].id, today_id);
        assert_eq!(todays[0].total_cents, 100);

        let yesterdays = repo.list_for_day(yesterday.date_naive()).await.unwrap();
        assert_eq!(yesterdays.len(), 1);
        assert_eq!(yesterdays[0].id, yesterday_id);

        let empty = repo.list_for_day((now + Duration::days(1)).date_naive()).await.unwrap();
        assert!(empty.is_empty());
    }
}
