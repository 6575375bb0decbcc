// =============================================================================
// fxtrend Main Entry Point
// =============================================================================
//
// One-shot analyzer: fetch each configured pair, compute indicators, classify
// the trend, and report the verdicts through the log.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod cache;
mod config;
mod fetcher;
mod indicators;
mod market_data;
mod source;
mod trend;
mod twelvedata;
mod types;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cache::CachedFetcher;
use crate::config::AnalyzerConfig;
use crate::fetcher::PriceSeriesFetcher;
use crate::indicators::compute_indicators;
use crate::trend::classify_trend;
use crate::twelvedata::TwelveDataClient;
use crate::types::{Interval, RsiZone};

const CONFIG_PATH: &str = "fxtrend.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting fxtrend forex trend analyzer");

    let mut config = AnalyzerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let defaults = AnalyzerConfig::default();
        if let Err(e) = defaults.save(CONFIG_PATH) {
            warn!(error = %e, "Failed to write default config");
        }
        defaults
    });

    // Override the watchlist and interval from env if available.
    if let Ok(syms) = std::env::var("FXTREND_SYMBOLS") {
        config.symbols = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if config.symbols.is_empty() {
        config.symbols = AnalyzerConfig::default().symbols;
    }
    if let Ok(iv) = std::env::var("FXTREND_INTERVAL") {
        config.interval = iv.parse::<Interval>().context("invalid FXTREND_INTERVAL")?;
    }

    info!(symbols = ?config.symbols, interval = %config.interval, "Configured watchlist");

    // ── 2. Build the data source ─────────────────────────────────────────
    let api_key = std::env::var("TWELVE_DATA_API_KEY")
        .context("TWELVE_DATA_API_KEY is not set (export it or add it to .env)")?;

    let client = TwelveDataClient::new(api_key);
    let fetcher = PriceSeriesFetcher::with_policy(client, config.retry_policy());
    let fetcher = CachedFetcher::new(fetcher, config.cache_ttl());

    // ── 3. Analyse each configured pair ──────────────────────────────────
    for symbol in &config.symbols {
        let series = fetcher.fetch(symbol, config.interval).await;
        if series.is_empty() {
            warn!(symbol = %symbol, interval = %config.interval, "no data available, skipping");
            continue;
        }

        if let Some(summary) = series.summary() {
            info!(
                symbol = %symbol,
                last_close = summary.last_close,
                period_high = summary.period_high,
                period_low = summary.period_low,
                bars = series.len(),
                "price summary"
            );
        }

        let rows = compute_indicators(&series);
        let verdict = classify_trend(&rows);

        info!(
            symbol = %symbol,
            direction = %verdict.direction,
            strength = %verdict.strength,
            change_percent = ?verdict.change_percent,
            rsi = ?verdict.rsi_value,
            "trend verdict"
        );

        match verdict.rsi_zone() {
            Some(RsiZone::Overbought) => warn!(symbol = %symbol, "Overbought condition (RSI > 70)"),
            Some(RsiZone::Oversold) => warn!(symbol = %symbol, "Oversold condition (RSI < 30)"),
            Some(RsiZone::Neutral) => info!(symbol = %symbol, "RSI in neutral territory"),
            None => {}
        }

        info!(symbol = %symbol, "{}", verdict.insight());
    }

    info!("Analysis complete.");
    Ok(())
}
