//! HTTP routes.
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | GET  | `/health` | - | `{"status": "ok"}` |
//! | POST | `/portfolio/stats` | `{"tickers": [..], "weights": [..]}` | statistics |
//! | POST | `/portfolio/optimize/{mode}` | `{"tickers": [..]}` | statistics + `mode` |
//!
//! A missing body or missing field counts as an empty list. Any calculation
//! failure is a 400 with `{"error": message}`.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use gridfolio::{OptimizedPortfolio, Optimizer, PortfolioStats};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// State shared by every handler. Read-only.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    optimizer: Optimizer,
}

impl AppState {
    pub fn new(optimizer: Optimizer) -> Self {
        Self { optimizer }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatsRequest {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeRequest {
    pub tickers: Vec<String>,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/portfolio/stats", post(stats))
        .route("/portfolio/optimize/{mode}", post(optimize))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn stats(body: Bytes) -> Result<Json<PortfolioStats>, ApiError> {
    let req: StatsRequest = parse_body(&body)?;

    let stats = gridfolio::compute_stats(&req.tickers, &req.weights)
        .inspect_err(|e| log::warn!("stats rejected for {:?}: {e}", req.tickers))?;

    log::debug!(
        "stats {:?} -> return={:.4} vol={:.4} sharpe={:.4}",
        stats.tickers,
        stats.expected_annual_return,
        stats.annual_volatility,
        stats.sharpe_ratio
    );
    Ok(Json(stats))
}

async fn optimize(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    body: Bytes,
) -> Result<Json<OptimizedPortfolio>, ApiError> {
    let req: OptimizeRequest = parse_body(&body)?;
    let tickers = req.tickers;

    // The grid search is CPU-bound; keep it off the async workers.
    let optimizer = state.optimizer.clone();
    let (tickers, result) = tokio::task::spawn_blocking(move || {
        let result = optimizer.optimize_named(&tickers, &mode);
        (tickers, result)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let best = result.inspect_err(|e| log::warn!("optimize rejected for {tickers:?}: {e}"))?;

    log::debug!(
        "optimize {} {:?} -> weights={:?} vol={:.4} sharpe={:.4}",
        best.mode,
        best.stats.tickers,
        best.stats.weights,
        best.stats.annual_volatility,
        best.stats.sharpe_ratio
    );
    Ok(Json(best))
}

/// Decode a JSON body; empty or `null` bodies decode as `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let parsed: Option<T> = serde_json::from_slice(body)?;
    Ok(parsed.unwrap_or_default())
}
