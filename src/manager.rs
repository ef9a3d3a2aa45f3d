//! Batch price resolution.
//!
//! [`PriceManager`] sequences one batch lookup: probe the cache, borrow a
//! write column for the misses, write one lookup formula per miss, poll the
//! region until the service has evaluated it, parse and memoize the values,
//! clear the region, and hand the column back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::cache::PriceCache;
use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::gateway::{RangeAddress, SpreadsheetGateway};
use crate::pool::ColumnPool;

/// Recorded for identifiers whose evaluated cell could not be read as a
/// number. A normal entry in the result map, not an error signal; never
/// written to the cache.
pub const UNRESOLVED_PRICE: f64 = -1.0;

/// Formula asking the service to evaluate the current price of a ticker.
fn price_formula(ticker: &str) -> String {
    format!(r#"=GOOGLEFINANCE("{ticker}", "price")"#)
}

/// Orchestrates cache, column pool, and spreadsheet gateway for batch
/// lookups. One instance is shared by all callers; concurrent batches are
/// bounded by the pool capacity.
pub struct PriceManager {
    gateway: Arc<dyn SpreadsheetGateway>,
    pool: ColumnPool,
    cache: PriceCache,
    sheet_name: String,
    retry: RetryConfig,
}

impl PriceManager {
    pub fn new(
        gateway: Arc<dyn SpreadsheetGateway>,
        pool: ColumnPool,
        cache: PriceCache,
        sheet_name: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            gateway,
            pool,
            cache,
            sheet_name: sheet_name.into(),
            retry,
        }
    }

    /// Resolve each ticker to a price.
    ///
    /// Cached tickers are answered locally; the rest go through one remote
    /// write/read/clear cycle on a pooled column. A batch made entirely of
    /// cache hits performs no remote traffic at all. Duplicates are allowed
    /// and resolve independently into the same result key.
    ///
    /// On success the map holds exactly one entry per distinct ticker, with
    /// [`UNRESOLVED_PRICE`] for tickers the service could not price. On any
    /// remote failure the whole call fails and cache hits collected earlier
    /// in the same batch are discarded.
    pub async fn read_prices(&self, tickers: &[&str]) -> Result<HashMap<String, f64>> {
        let mut prices = HashMap::with_capacity(tickers.len());
        let mut pending = Vec::new();

        for &ticker in tickers {
            match self.cache.get(ticker) {
                Some(price) => {
                    prices.insert(ticker.to_owned(), price);
                }
                None => pending.push(ticker),
            }
        }

        if pending.is_empty() {
            debug!(tickers = tickers.len(), "Batch served from cache");
            return Ok(prices);
        }

        let guard = self.pool.acquire().await;
        // The region always spans the full batch, not just the misses; the
        // service addresses it by the original batch length.
        let range = RangeAddress::new(&self.sheet_name, guard.column(), tickers.len());

        debug!(range = %range, misses = pending.len(), "Resolving batch remotely");

        let formulas: Vec<String> = pending.iter().map(|t| price_formula(t)).collect();
        self.gateway
            .write_formulas(&range, &formulas)
            .await
            .map_err(Error::Write)?;

        let rows = self.read_with_retry(&range).await?;

        for (i, ticker) in pending.iter().enumerate() {
            match parse_price_cell(rows.get(i)) {
                Some(price) => {
                    self.cache.set(ticker, price);
                    prices.insert((*ticker).to_owned(), price);
                }
                None => {
                    prices.insert((*ticker).to_owned(), UNRESOLVED_PRICE);
                }
            }
        }

        self.gateway
            .clear_values(&range)
            .await
            .map_err(Error::Clear)?;

        Ok(prices)
    }

    /// Poll the region until it holds evaluated values.
    ///
    /// An empty result set means the service has not finished computing,
    /// and counts as a failed attempt. Waits grow linearly with the attempt
    /// index; there is no wait after the final attempt.
    async fn read_with_retry(&self, range: &RangeAddress) -> Result<Vec<Vec<Value>>> {
        let attempts = self.retry.read_attempts;
        let unit = Duration::from_millis(self.retry.backoff_unit_ms);
        let mut last = None;

        for attempt in 1..=attempts {
            match self.gateway.read_values(range).await {
                Ok(rows) if !rows.is_empty() => return Ok(rows),
                Ok(_) => {
                    debug!(range = %range, attempt, "Evaluation not ready");
                }
                Err(e) => {
                    warn!(range = %range, attempt, error = %e, "Read attempt failed");
                    last = Some(e);
                }
            }

            if attempt < attempts {
                sleep(unit * attempt).await;
            }
        }

        Err(Error::RetryExhausted { attempts, last })
    }

    /// Drop all memoized prices. Reset tooling only.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Pull a price out of one evaluated row.
///
/// Only a leading string cell holding a parseable number counts; a missing
/// row, missing cell, non-string cell, or unparsable text all resolve to
/// `None` (and from there to the sentinel), never to a panic.
fn parse_price_cell(row: Option<&Vec<Value>>) -> Option<f64> {
    match row?.first()? {
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
