//! Sheetquote - ticker price lookups through a shared Google Sheet.
//!
//! This crate resolves ticker symbols to prices by delegating the actual
//! computation to a spreadsheet service: it writes one lookup formula per
//! ticker into a reserved column, waits for the service to evaluate them,
//! reads the values back, and erases the formulas. Results are memoized
//! with a TTL, and concurrent batches are serialized onto a small pool of
//! interchangeable write columns so they never overwrite each other.
//!
//! # Modules
//!
//! - [`client`] - [`QuoteClient`], the ready-to-use wrapper
//! - [`manager`] - batch orchestration: cache probe, column acquisition,
//!   formula write, polling read with retry, cleanup
//! - [`pool`] - bounded pool of write columns
//! - [`cache`] - TTL-bounded, best-effort price memoization
//! - [`gateway`] - the spreadsheet service boundary (Google Sheets REST,
//!   service-account auth)
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use sheetquote::config::Config;
//! use sheetquote::QuoteClient;
//!
//! # async fn run() -> sheetquote::Result<()> {
//! let config = Config::load("config.toml")?;
//! let client = QuoteClient::new(&config)?;
//!
//! let prices = client.read_prices(&["VTI", "VGT"]).await?;
//! println!("{prices:?}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod pool;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use client::QuoteClient;
pub use error::{Error, Result};
pub use manager::UNRESOLVED_PRICE;
