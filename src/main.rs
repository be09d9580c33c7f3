//! Financial dashboard CLI
//!
//! Fetches market data, prepares chart payloads and runs portfolio
//! simulations from the command line.

use clap::{Parser, Subcommand};
use findash::{
    chart::{PortfolioChart, QuoteChart},
    client::{AlphaVantageClient, SymbolCache},
    config::Config,
    error::DashboardError,
    portfolio::{compute_evolution, Holding},
    types::{PurchaseEvent, SymbolListing},
};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "findash")]
#[command(about = "Financial dashboard: market charts and portfolio simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "findash.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List available symbols
    Symbols {
        /// Filter by substring of the symbol or company name
        #[arg(short, long)]
        query: Option<String>,
        /// Number of listings to show
        #[arg(short, long, default_value = "25")]
        limit: usize,
    },
    /// Show a symbol's daily open/volume chart data
    Chart {
        /// Symbol to chart
        symbol: String,
    },
    /// Simulate a portfolio from purchase events
    Simulate {
        /// Purchase as SYMBOL:DATE:SHARES (repeat per holding)
        #[arg(long = "buy", required = true)]
        buys: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Symbols { query, limit } => show_symbols(config, query, limit).await,
        Commands::Chart { symbol } => show_chart(config, &symbol).await,
        Commands::Simulate { buys } => simulate(config, &buys).await,
    }
}

async fn show_symbols(config: Config, query: Option<String>, limit: usize) -> anyhow::Result<()> {
    let client = AlphaVantageClient::new(&config.api)?;
    let mut cache = SymbolCache::new(Duration::from_secs(config.cache.symbols_ttl_secs));

    let listings = cache.get_or_fetch(&client).await?;
    let needle = query.map(|q| q.to_lowercase());
    let matching: Vec<&SymbolListing> = listings
        .iter()
        .filter(|l| match &needle {
            Some(q) => l.label().to_lowercase().contains(q),
            None => true,
        })
        .take(limit)
        .collect();

    println!("\nAvailable symbols\n");
    for listing in &matching {
        println!("{:<8} {:<50} {}", listing.symbol, listing.name, listing.exchange);
    }
    println!("\n{} shown", matching.len());

    Ok(())
}

async fn show_chart(config: Config, symbol: &str) -> anyhow::Result<()> {
    let client = AlphaVantageClient::new(&config.api)?;
    let mut cache = SymbolCache::new(Duration::from_secs(config.cache.symbols_ttl_secs));

    let title = lookup_label(&mut cache, &client, symbol).await?;
    let series = client.daily_series(symbol).await?.decode()?;
    let chart = QuoteChart::build(&series, title);

    println!("\n{}\n", chart.title);
    for point in &chart.points {
        println!(
            "{}  open {:>10.2}  volume {:>14.0}",
            point.date, point.open, point.volume
        );
    }
    println!("\n{} trading days", chart.points.len());

    Ok(())
}

async fn simulate(config: Config, buys: &[String]) -> anyhow::Result<()> {
    if buys.len() > config.simulation.max_holdings {
        anyhow::bail!(
            "at most {} purchases are supported, got {}",
            config.simulation.max_holdings,
            buys.len()
        );
    }

    let client = AlphaVantageClient::new(&config.api)?;
    let mut cache = SymbolCache::new(Duration::from_secs(config.cache.symbols_ttl_secs));

    let mut holdings = Vec::with_capacity(buys.len());
    for buy in buys {
        let (symbol, date, shares) = parse_buy(buy)?;
        if shares < config.simulation.min_shares {
            anyhow::bail!(
                "{}: at least {} share(s) required, got {}",
                symbol,
                config.simulation.min_shares,
                shares
            );
        }

        let name = lookup_label(&mut cache, &client, &symbol).await?;
        let series = client.daily_series(&symbol).await?;
        let purchase = PurchaseEvent::new(symbol.as_str(), name, &date, shares)?;

        println!("Bought {} shares of {} on {}", shares, symbol, purchase.date);
        holdings.push(Holding { series, purchase });
    }

    let table = compute_evolution(&holdings)?;
    for summary in &table.holdings {
        if summary.empty {
            tracing::warn!("{}: no price data after purchase date", summary.name);
        }
    }

    let chart = PortfolioChart::build(&table, "Portfolio");

    println!("\nPortfolio simulation\n");
    for (row, note) in table.rows.iter().zip(chart.annotations.iter()) {
        println!("{}  position {:>12.2}", row.date, row.position);
        tracing::debug!("hover: {}", note.replace('\n', "; "));
    }

    Ok(())
}

/// Split a SYMBOL:DATE:SHARES purchase spec. The date may itself contain
/// colons (RFC 3339), so the symbol is taken from the front and the share
/// count from the back.
fn parse_buy(spec: &str) -> anyhow::Result<(String, String, Decimal)> {
    let malformed = || anyhow::anyhow!("expected SYMBOL:DATE:SHARES, got {spec:?}");

    let (symbol, rest) = spec.split_once(':').ok_or_else(malformed)?;
    let (date, shares) = rest.rsplit_once(':').ok_or_else(malformed)?;
    let shares: Decimal = shares.trim().parse().map_err(|_| malformed())?;

    Ok((symbol.trim().to_uppercase(), date.trim().to_string(), shares))
}

/// Resolve a symbol's display label from the cached listing
async fn lookup_label(
    cache: &mut SymbolCache,
    client: &AlphaVantageClient,
    symbol: &str,
) -> anyhow::Result<String> {
    let listings = cache.get_or_fetch(client).await?;
    let listing = listings
        .iter()
        .find(|l| l.symbol.eq_ignore_ascii_case(symbol))
        .ok_or_else(|| DashboardError::SymbolNotFound(symbol.to_string()))?;
    Ok(listing.label())
}
