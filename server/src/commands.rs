//! Subcommand implementations: run the server, or compute offline.

use std::fmt;

use gridfolio::{Optimizer, instruments};
use tokio::net::TcpListener;

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::{Error, Result};

/// Run the HTTP API until Ctrl-C.
pub fn serve(config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve_async(config))
}

/// Async body of [`serve`], for callers that already own a runtime.
pub async fn serve_async(config: &Config) -> Result<()> {
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;

    log::info!("listening on http://{}", listener.local_addr()?);
    log::info!(
        "optimizer accepts up to {} tickers",
        config.optimizer.max_assets
    );

    let app = api::router(AppState::new(config.optimizer()));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("cannot listen for Ctrl-C, running until killed: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutdown requested");
}

/// Statistics for one portfolio, as pretty JSON.
pub fn stats_report(tickers: &[String], weights: &[f64]) -> Result<String> {
    let stats = gridfolio::compute_stats(tickers, weights)?;
    Ok(serde_json::to_string_pretty(&stats)?)
}

/// Optimized allocation, as pretty JSON.
pub fn optimize_report(optimizer: &Optimizer, tickers: &[String], mode: &str) -> Result<String> {
    let best = optimizer.optimize_named(tickers, mode)?;
    Ok(serde_json::to_string_pretty(&best)?)
}

/// The instrument universe, rendered as an aligned text table.
pub struct InstrumentTable;

impl fmt::Display for InstrumentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6} {:>8} {:>10}", "TICKER", "RETURN", "VOLATILITY")?;
        for inst in instruments() {
            writeln!(
                f,
                "{:<6} {:>7.2}% {:>9.2}%",
                inst.ticker,
                inst.expected_return * 100.0,
                inst.volatility * 100.0
            )?;
        }
        Ok(())
    }
}

/// The instrument table as aligned text.
pub fn instruments_table() -> String {
    InstrumentTable.to_string()
}
