//! Canonical test configurations and manager wiring.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::PriceCache;
use crate::config::RetryConfig;
use crate::gateway::SpreadsheetGateway;
use crate::manager::PriceManager;
use crate::pool::ColumnPool;

/// Retry settings with a millisecond backoff unit so retry paths run fast.
#[must_use]
pub fn retry_fast() -> RetryConfig {
    RetryConfig {
        read_attempts: 3,
        backoff_unit_ms: 5,
    }
}

/// A generously sized cache with a one-minute TTL.
#[must_use]
pub fn cache() -> PriceCache {
    PriceCache::new(Duration::from_secs(60), 1024)
}

/// Wire a manager over the given gateway with `columns` pool columns and
/// the standard test cache and retry settings.
#[must_use]
pub fn manager(gateway: Arc<dyn SpreadsheetGateway>, columns: usize) -> PriceManager {
    manager_with_cache(gateway, columns, cache())
}

/// Same as [`manager`] but with a caller-prepared cache, for tests that
/// pre-seed entries or need a tiny TTL.
#[must_use]
pub fn manager_with_cache(
    gateway: Arc<dyn SpreadsheetGateway>,
    columns: usize,
    cache: PriceCache,
) -> PriceManager {
    PriceManager::new(
        gateway,
        ColumnPool::new(columns).expect("valid test pool size"),
        cache,
        "price",
        retry_fast(),
    )
}
