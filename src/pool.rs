//! Bounded pool of spreadsheet write columns.
//!
//! The remote sheet exposes a handful of usable write regions, one per
//! column. Each in-flight batch needs exclusive use of one column so that
//! concurrent batches never overwrite each other's formulas. The pool hands
//! out column labels one at a time and takes them back when the holder is
//! done.
//!
//! Labels are generated at construction (`A`, `B`, ... up to the configured
//! count) and only circulate afterwards; none are created or destroyed.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::ConfigError;

/// Largest supported pool: columns `A` through `F`.
pub const MAX_COLUMNS: usize = 6;

/// A single write-column label.
///
/// Identity only matters for range addressing; any free column is as good
/// as any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column(char);

impl Column {
    /// The column letter, `'A'..='F'`.
    #[must_use]
    pub const fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-capacity pool of interchangeable write columns.
///
/// [`acquire`](ColumnPool::acquire) blocks until a column is free and
/// returns a guard that restores the column on drop, so a column is
/// released on every exit path, including panics and cancelled futures.
pub struct ColumnPool {
    free: Mutex<VecDeque<Column>>,
    permits: Semaphore,
    capacity: usize,
}

impl ColumnPool {
    /// Create a pool with `columns` usable write columns.
    ///
    /// Fails for `columns == 0` or `columns > MAX_COLUMNS`.
    pub fn new(columns: usize) -> Result<Self, ConfigError> {
        if columns == 0 || columns > MAX_COLUMNS {
            return Err(ConfigError::InvalidValue {
                field: "pool.columns",
                reason: format!("must be 1..={MAX_COLUMNS}, got {columns}"),
            });
        }

        let free = (0..columns)
            .map(|i| Column(char::from(b'A' + i as u8)))
            .collect();

        Ok(Self {
            free: Mutex::new(free),
            permits: Semaphore::new(columns),
            capacity: columns,
        })
    }

    /// Wait until a column is free and take exclusive ownership of it.
    ///
    /// Waiters are served in FIFO order.
    pub async fn acquire(&self) -> ColumnGuard<'_> {
        let permit = self
            .permits
            .acquire()
            .await
            .expect("column pool semaphore closed");

        // One permit corresponds to exactly one free label.
        let column = self
            .free
            .lock()
            .pop_front()
            .expect("free column missing for held permit");

        ColumnGuard {
            column,
            pool: self,
            _permit: permit,
        }
    }

    /// Number of columns this pool was built with.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of columns currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

/// Exclusive hold on one pool column.
///
/// Dropping the guard returns the column to the pool.
pub struct ColumnGuard<'a> {
    column: Column,
    pool: &'a ColumnPool,
    _permit: SemaphorePermit<'a>,
}

impl ColumnGuard<'_> {
    /// The held column label.
    #[must_use]
    pub fn column(&self) -> Column {
        self.column
    }
}

impl Drop for ColumnGuard<'_> {
    fn drop(&mut self) {
        // Requeue the label before the permit is released so the next
        // acquirer always finds one.
        self.pool.free.lock().push_back(self.column);
    }
}

impl fmt::Debug for ColumnGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnGuard")
            .field("column", &self.column)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn rejects_zero_columns() {
        assert!(ColumnPool::new(0).is_err());
    }

    #[test]
    fn rejects_oversized_pool() {
        assert!(ColumnPool::new(MAX_COLUMNS + 1).is_err());
    }

    #[test]
    fn accepts_full_supported_range() {
        for n in 1..=MAX_COLUMNS {
            let pool = ColumnPool::new(n).unwrap();
            assert_eq!(pool.capacity(), n);
            assert_eq!(pool.available(), n);
        }
    }

    #[tokio::test]
    async fn acquire_hands_out_distinct_columns() {
        let pool = ColumnPool::new(3).unwrap();
        let a = pool.acquire().await;
        let b = pool.acquire().await;
        let c = pool.acquire().await;

        assert_ne!(a.column(), b.column());
        assert_ne!(b.column(), c.column());
        assert_ne!(a.column(), c.column());
        assert_eq!(pool.available(), 0);
    }

    #[tokio::test]
    async fn dropped_guard_returns_column() {
        let pool = ColumnPool::new(1).unwrap();

        let guard = pool.acquire().await;
        let first = guard.column();
        assert_eq!(pool.available(), 0);
        drop(guard);
        assert_eq!(pool.available(), 1);

        let guard = pool.acquire().await;
        assert_eq!(guard.column(), first);
    }

    #[tokio::test]
    async fn exhausted_pool_blocks_until_release() {
        let pool = Arc::new(ColumnPool::new(1).unwrap());
        let guard = pool.acquire().await;

        let waiter = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.acquire().await.column() })
        };

        // The waiter cannot finish while the guard is held.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        let column = waiter.await.unwrap();
        assert_eq!(column.letter(), 'A');
    }

    #[tokio::test]
    async fn labels_cover_prefix_of_alphabet() {
        let pool = ColumnPool::new(4).unwrap();
        let mut letters = Vec::new();
        {
            let g1 = pool.acquire().await;
            let g2 = pool.acquire().await;
            let g3 = pool.acquire().await;
            let g4 = pool.acquire().await;
            for g in [&g1, &g2, &g3, &g4] {
                letters.push(g.column().letter());
            }
        }
        letters.sort_unstable();
        assert_eq!(letters, vec!['A', 'B', 'C', 'D']);
    }
}
