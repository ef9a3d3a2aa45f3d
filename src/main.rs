use anyhow::Context;
use clap::Parser;
use sheetquote::cli::Cli;
use sheetquote::config::Config;
use sheetquote::{QuoteClient, UNRESOLVED_PRICE};
use tracing::info;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();

    if let Err(e) = run(&config, &cli).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let client = QuoteClient::new(config).context("failed to build client")?;

    let tickers: Vec<&str> = cli.tickers.iter().map(String::as_str).collect();
    info!(tickers = tickers.len(), "Looking up prices");

    let prices = client.read_prices(&tickers).await.context("price lookup failed")?;

    for ticker in &cli.tickers {
        match prices.get(ticker.as_str()) {
            Some(&price) if price != UNRESOLVED_PRICE => println!("{ticker}\t{price}"),
            _ => println!("{ticker}\t-"),
        }
    }
    Ok(())
}
