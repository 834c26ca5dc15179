//! # Config Repository
//!
//! Raw key/value configuration rows. The margin-aware view with caching
//! and typed accessors lives in [`crate::config_store::ConfigStore`];
//! this repository is the storage underneath it.

use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ConfigRepository {
    pool: SqlitePool,
}

impl ConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ConfigRepository { pool }
    }

    /// Loads every config row as a map.
    pub async fn all(&self) -> DbResult<HashMap<String, String>> {
        let rows = sqlx::query("SELECT key, value FROM config")
            .fetch_all(&self.pool)
            .await?;

        let mut map = HashMap::with_capacity(rows.len());
        for row in &rows {
            map.insert(row.try_get("key")?, row.try_get("value")?);
        }
        Ok(map)
    }

    /// Reads one value. `None` when the key doesn't exist.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Inserts or replaces a value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO config (key, value) VALUES (?, ?)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_seeded_margins_present() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.config();

        assert_eq!(repo.get("MARGIN_CASH").await.unwrap().as_deref(), Some("1.50"));
        assert_eq!(repo.get("MARGIN_TRANSFER").await.unwrap().as_deref(), Some("1.52"));
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.config();

        repo.set("MARGIN_CASH", "1.60").await.unwrap();
        assert_eq!(repo.get("MARGIN_CASH").await.unwrap().as_deref(), Some("1.60"));

        let all = repo.all().await.unwrap();
        assert_eq!(all.get("MARGIN_CASH").map(String::as_str), Some("1.60"));
    }
}
