//! # Price Matrix Repository
//!
//! Storage for the copy-center price matrix: one row per exact
//! (size, paper, color, sidedness) combination. Lookup is exact-match
//! only; absence means "not configured", which the resolver turns into
//! a domain error.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use copypoint_core::{ColorMode, PaperSize, PaperType, PriceRequest, Sidedness};

use crate::error::DbResult;

/// One configured cell of the matrix, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceEntry {
    pub request: PriceRequest,
    pub price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct PriceMatrixRepository {
    pool: SqlitePool,
}

fn map_entry(row: &SqliteRow) -> Result<PriceEntry, sqlx::Error> {
    let size: PaperSize = row.try_get("paper_size")?;
    let paper: PaperType = row.try_get("paper_type")?;
    let color: ColorMode = row.try_get("color_mode")?;
    let sidedness: Sidedness = row.try_get("sidedness")?;
    Ok(PriceEntry {
        request: PriceRequest::new(size, paper, color, sidedness),
        price_cents: row.try_get("price_cents")?,
    })
}

impl PriceMatrixRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PriceMatrixRepository { pool }
    }

    /// Exact-match lookup. `None` means the combination is not configured.
    pub async fn find_price(&self, request: &PriceRequest) -> DbResult<Option<i64>> {
        debug!(%request, "Price matrix lookup");

        let price: Option<i64> = sqlx::query_scalar(
            "SELECT price_cents FROM price_matrix
             WHERE paper_size = ? AND paper_type = ? AND color_mode = ? AND sidedness = ?",
        )
        .bind(request.size)
        .bind(request.paper)
        .bind(request.color)
        .bind(request.sidedness)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price)
    }

    /// Sets (or replaces) the price for a combination.
    pub async fn set_price(&self, request: &PriceRequest, price_cents: i64) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO price_matrix (paper_size, paper_type, color_mode, sidedness, price_cents)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (paper_size, paper_type, color_mode, sidedness)
             DO UPDATE SET price_cents = excluded.price_cents",
        )
        .bind(request.size)
        .bind(request.paper)
        .bind(request.color)
        .bind(request.sidedness)
        .bind(price_cents)
        .execute(&self.pool)
        .await?;

        debug!(%request, price_cents, "Price matrix entry set");
        Ok(())
    }

    /// Removes a combination from the matrix.
    pub async fn remove(&self, request: &PriceRequest) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM price_matrix
             WHERE paper_size = ? AND paper_type = ? AND color_mode = ? AND sidedness = ?",
        )
        .bind(request.size)
        .bind(request.paper)
        .bind(request.color)
        .bind(request.sidedness)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every configured entry (admin screen).
    pub async fn list_all(&self) -> DbResult<Vec<PriceEntry>> {
        let rows = sqlx::query(
            "SELECT paper_size, paper_type, color_mode, sidedness, price_cents
             FROM price_matrix
             ORDER BY paper_size, paper_type, color_mode, sidedness",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_entry).collect::<Result<_, _>>().map_err(Into::into)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn a4_mono_simplex() -> PriceRequest {
        PriceRequest::new(PaperSize::A4, PaperType::Plain80g, ColorMode::Mono, Sidedness::Simplex)
    }

    #[tokio::test]
    async fn test_set_and_find_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.price_matrix();

        repo.set_price(&a4_mono_simplex(), 50).await.unwrap();
        assert_eq!(repo.find_price(&a4_mono_simplex()).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn test_unconfigured_combination_is_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.price_matrix();

        repo.set_price(&a4_mono_simplex(), 50).await.unwrap();

        // Same combination except sidedness: no fallback across dimensions.
        let duplex = PriceRequest::new(
            PaperSize::A4,
            PaperType::Plain80g,
            ColorMode::Mono,
            Sidedness::Duplex,
        );
        assert_eq!(repo.find_price(&duplex).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_price_replaces() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.price_matrix();

        repo.set_price(&a4_mono_simplex(), 50).await.unwrap();
        repo.set_price(&a4_mono_simplex(), 60).await.unwrap();

        assert_eq!(repo.find_price(&a4_mono_simplex()).await.unwrap(), Some(60));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.price_matrix();

        repo.set_price(&a4_mono_simplex(), 50).await.unwrap();
        assert!(repo.remove(&a4_mono_simplex()).await.unwrap());
        assert!(!repo.remove(&a4_mono_simplex()).await.unwrap());
        assert_eq!(repo.find_price(&a4_mono_simplex()).await.unwrap(), None);
    }
}
