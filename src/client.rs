//! Caller-facing convenience wrapper.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::PriceCache;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::auth::TokenProvider;
use crate::gateway::sheets::SheetsGateway;
use crate::manager::PriceManager;
use crate::pool::ColumnPool;

/// Ready-to-use price lookup client.
///
/// Owns the whole context (gateway, column pool, cache); build one per
/// target spreadsheet and share it across tasks by reference.
pub struct QuoteClient {
    manager: PriceManager,
}

impl QuoteClient {
    /// Wire up a client from configuration: load the service-account key,
    /// authenticate a Sheets gateway, and size the pool and cache.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::new();
        let auth = TokenProvider::from_key_file(http.clone(), &config.sheets.credentials_path)?;
        let gateway = SheetsGateway::new(http, config.sheets.spreadsheet_id.clone(), auth);

        let pool = ColumnPool::new(config.pool.columns)?;
        let cache = PriceCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.capacity,
        );

        Ok(Self {
            manager: PriceManager::new(
                Arc::new(gateway),
                pool,
                cache,
                config.sheets.sheet_name.clone(),
                config.retry.clone(),
            ),
        })
    }

    /// Resolve each ticker to a price. See
    /// [`PriceManager::read_prices`] for the full contract.
    pub async fn read_prices(&self, tickers: &[&str]) -> Result<HashMap<String, f64>> {
        self.manager.read_prices(tickers).await
    }

    /// Drop all memoized prices.
    pub fn clear_cache(&self) {
        self.manager.clear_cache();
    }
}
