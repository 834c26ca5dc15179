//! # Config Store
//!
//! Cached view over the `config` table, specialized for the pricing
//! margins the cashier flow reads on every keystroke.
//!
//! ## Caching
//! The full key/value map is loaded once and swapped atomically on
//! reload, so readers always see a complete snapshot and never a
//! half-applied update. Margin reads are synchronous and never touch
//! the database.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{info, warn};

use copypoint_core::{
    CONFIG_KEY_MARGIN_CASH, CONFIG_KEY_MARGIN_TRANSFER, DEFAULT_MARGIN_CASH,
    DEFAULT_MARGIN_TRANSFER,
};

use crate::error::DbResult;
use crate::repository::config::ConfigRepository;

/// In-memory configuration cache backed by the config table.
#[derive(Debug)]
pub struct ConfigStore {
    repo: ConfigRepository,
    cache: RwLock<HashMap<String, String>>,
}

impl ConfigStore {
    /// Builds the store and loads the initial cache.
    ///
    /// A failed initial load is not fatal: the store starts with an
    /// empty cache (so margin reads fall back to the defaults) and logs
    /// a warning. The shop keeps selling at default margins.
    pub async fn new(pool: sqlx::SqlitePool) -> Self {
        let store = ConfigStore {
            repo: ConfigRepository::new(pool),
            cache: RwLock::new(HashMap::new()),
        };

        if let Err(e) = store.reload().await {
            warn!(error = %e, "Initial config load failed, using default margins");
        }

        store
    }

    /// Reloads the cache from the database, replacing it wholesale.
    /// On failure the previous cache stays in place.
    pub async fn reload(&self) -> DbResult<()> {
        let fresh = self.repo.all().await?;
        let count = fresh.len();

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        *cache = fresh;
        drop(cache);

        info!(entries = count, "Config cache reloaded");
        Ok(())
    }

    /// Reads a raw value from the cache.
    pub fn get(&self, key: &str) -> Option<String> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    /// Persists a value and reloads the cache. The write and the
    /// reload both propagate errors; the cache is never updated
    /// speculatively ahead of the database.
    pub async fn update(&self, key: &str, value: &str) -> DbResult<()> {
        self.repo.set(key, value).await?;
        self.reload().await?;
        info!(key, value, "Config value updated");
        Ok(())
    }

    fn margin(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v > 0.0 => v,
                _ => {
                    warn!(key, raw, "Unparseable margin in config, using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Cash price margin (default 1.50).
    pub fn cash_margin(&self) -> f64 {
        self.margin(CONFIG_KEY_MARGIN_CASH, DEFAULT_MARGIN_CASH)
    }

    /// Transfer price margin (default 1.52).
    pub fn transfer_margin(&self) -> f64 {
        self.margin(CONFIG_KEY_MARGIN_TRANSFER, DEFAULT_MARGIN_TRANSFER)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
