//! Portfolio statistics: expected return, volatility, and Sharpe ratio.
//!
//! For weights `w`, expected returns `μ` and covariance `Σ`:
//!
//! ```text
//! return     = w · μ
//! volatility = sqrt(max(wᵗ Σ w, 0))
//! sharpe     = (return - r_f) / volatility     (0 when volatility == 0)
//! ```

use crate::error::{Error, Result};
use crate::market::{self, CovarianceMatrix, RISK_FREE_RATE};

/// Weights whose sum is within this distance of 1.0 are left untouched.
///
/// Tighter than a relative `isclose`: anything inside the band is returned
/// as given, so the band bounds how far a result's weights may stray from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-8;

/// Risk/return summary of a weighted portfolio.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioStats {
    /// Tickers, in request order
    pub tickers: Vec<String>,
    /// Normalized weights, one per ticker
    pub weights: Vec<f64>,
    pub expected_annual_return: f64,
    pub annual_volatility: f64,
    /// (expected return - risk-free rate) / volatility
    pub sharpe_ratio: f64,
}

impl std::fmt::Display for PortfolioStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Portfolio Statistics")?;
        for (ticker, w) in self.tickers.iter().zip(&self.weights) {
            writeln!(f, "  {ticker:<6} {:>8.2}%", w * 100.0)?;
        }
        writeln!(
            f,
            "  Return:     {:>8.2}%",
            self.expected_annual_return * 100.0
        )?;
        writeln!(f, "  Volatility: {:>8.2}%", self.annual_volatility * 100.0)?;
        write!(f, "  Sharpe:     {:>8.4}", self.sharpe_ratio)
    }
}

/// Compute statistics for `tickers` held at `weights`.
///
/// Validation runs in this order, stopping at the first failure:
/// empty ticker list, length mismatch, unknown ticker, negative or
/// non-finite weight, weights summing to zero.
///
/// # Example
///
/// ```
/// use gridfolio::compute_stats;
///
/// let stats = compute_stats(&["AAPL", "MSFT", "SPY"], &[0.3, 0.4, 0.3]).unwrap();
/// assert!((stats.expected_annual_return - 0.100).abs() < 1e-12);
/// ```
pub fn compute_stats<S: AsRef<str>>(tickers: &[S], weights: &[f64]) -> Result<PortfolioStats> {
    if tickers.is_empty() {
        return Err(Error::invalid("tickers list cannot be empty"));
    }
    if tickers.len() != weights.len() {
        return Err(Error::invalid("tickers and weights must have same length"));
    }

    let instruments = market::resolve(tickers)?;
    let w = normalize_weights(weights)?;

    let mu = market::expected_returns(&instruments);
    let cov = CovarianceMatrix::build(&instruments);
    let eval = evaluate(&mu, &cov, &w);

    Ok(PortfolioStats {
        tickers: tickers.iter().map(|t| t.as_ref().to_string()).collect(),
        weights: w,
        expected_annual_return: eval.expected_return,
        annual_volatility: eval.volatility,
        sharpe_ratio: sharpe_ratio(eval.expected_return, eval.volatility),
    })
}

/// Validate weights and rescale them to sum to 1.
///
/// Weights already summing to 1 (within [`WEIGHT_SUM_TOLERANCE`]) are
/// returned unchanged.
pub fn normalize_weights(weights: &[f64]) -> Result<Vec<f64>> {
    if weights.iter().any(|w| *w < 0.0) {
        return Err(Error::invalid("weights must be non-negative"));
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(Error::invalid("weights must be finite"));
    }

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return Err(Error::invalid("weights must not sum to zero"));
    }

    if (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        return Ok(weights.to_vec());
    }

    if total.is_finite() {
        return Ok(weights.iter().map(|w| w / total).collect());
    }

    // Finite weights can still overflow when summed; rescale by the largest
    // first so the sum stays within n.
    let peak = weights.iter().copied().fold(0.0_f64, f64::max);
    let scaled: Vec<f64> = weights.iter().map(|w| w / peak).collect();
    let total: f64 = scaled.iter().sum();
    Ok(scaled.into_iter().map(|w| w / total).collect())
}

/// Sharpe ratio against [`RISK_FREE_RATE`]; zero when volatility is zero.
pub fn sharpe_ratio(expected_return: f64, volatility: f64) -> f64 {
    if volatility == 0.0 {
        0.0
    } else {
        (expected_return - RISK_FREE_RATE) / volatility
    }
}

/// Return and volatility of one weight vector.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Evaluation {
    pub expected_return: f64,
    pub volatility: f64,
}

pub(crate) fn evaluate(mu: &[f64], cov: &CovarianceMatrix, w: &[f64]) -> Evaluation {
    // Rounding can push a near-zero variance slightly negative.
    let variance = cov.quadratic_form(w).max(0.0);
    Evaluation {
        expected_return: dot(w, mu),
        volatility: variance.sqrt(),
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
