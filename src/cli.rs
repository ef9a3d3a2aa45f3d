//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

/// Sheetquote - ticker price lookups through a shared Google Sheet.
#[derive(Parser, Debug)]
#[command(name = "sheetquote")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Ticker symbols to resolve
    #[arg(required = true)]
    pub tickers: Vec<String>,
}
