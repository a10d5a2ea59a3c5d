//! Fixed instrument universe and the synthetic covariance model built on it.
//!
//! The table holds four instruments with assumed annual returns and
//! volatilities. Covariances use a single pairwise correlation for every
//! pair of distinct positions:
//!
//! ```text
//! Σ[i][i] = σ_i²
//! Σ[i][j] = ρ · σ_i · σ_j      (i ≠ j, ρ = 0.3)
//! ```

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Pairwise correlation between any two distinct positions.
pub const CORRELATION: f64 = 0.3;

/// Annual risk-free rate used in the Sharpe ratio.
pub const RISK_FREE_RATE: f64 = 0.02;

/// A tradable instrument with its assumed annual return and volatility.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Instrument {
    pub ticker: &'static str,
    /// Expected annual return (e.g., 0.12 = 12%)
    pub expected_return: f64,
    /// Annualized standard deviation of returns
    pub volatility: f64,
}

const UNIVERSE: [Instrument; 4] = [
    Instrument {
        ticker: "AAPL",
        expected_return: 0.12,
        volatility: 0.22,
    },
    Instrument {
        ticker: "MSFT",
        expected_return: 0.10,
        volatility: 0.20,
    },
    Instrument {
        ticker: "SPY",
        expected_return: 0.08,
        volatility: 0.15,
    },
    Instrument {
        ticker: "TSLA",
        expected_return: 0.18,
        volatility: 0.35,
    },
];

static BY_TICKER: LazyLock<FxHashMap<&'static str, &'static Instrument>> =
    LazyLock::new(|| UNIVERSE.iter().map(|inst| (inst.ticker, inst)).collect());

/// All known instruments, in table order.
pub fn instruments() -> &'static [Instrument] {
    &UNIVERSE
}

/// Look up a single ticker. Matching is exact and case-sensitive.
pub fn lookup(ticker: &str) -> Result<&'static Instrument> {
    BY_TICKER
        .get(ticker)
        .copied()
        .ok_or_else(|| Error::UnknownInstrument(ticker.to_string()))
}

/// Resolve an ordered ticker list, failing on the first unknown ticker.
pub fn resolve<S: AsRef<str>>(tickers: &[S]) -> Result<Vec<&'static Instrument>> {
    tickers.iter().map(|t| lookup(t.as_ref())).collect()
}

/// Expected returns of `instruments`, in order.
pub fn expected_returns(instruments: &[&Instrument]) -> Vec<f64> {
    instruments.iter().map(|i| i.expected_return).collect()
}

/// Dense covariance matrix over an ordered list of positions.
#[derive(Clone, Debug, PartialEq)]
pub struct CovarianceMatrix {
    n: usize,
    // Row-major, n * n
    data: Vec<f64>,
}

impl CovarianceMatrix {
    /// Build the covariance matrix for `instruments` in the given order.
    ///
    /// Repeated instruments are distinct positions: their mutual entry uses
    /// [`CORRELATION`], not 1.0.
    pub fn build(instruments: &[&Instrument]) -> Self {
        let n = instruments.len();
        let mut data = vec![0.0; n * n];

        for (i, a) in instruments.iter().enumerate() {
            for (j, b) in instruments.iter().enumerate() {
                let corr = if i == j { 1.0 } else { CORRELATION };
                data[i * n + j] = corr * a.volatility * b.volatility;
            }
        }

        Self { n, data }
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Entry at row `i`, column `j`. Panics if out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range");
        self.data[i * self.n + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// `wᵗ Σ w` for a weight vector of matching length.
    pub fn quadratic_form(&self, w: &[f64]) -> f64 {
        debug_assert_eq!(w.len(), self.n);
        (0..self.n)
            .map(|i| w[i] * self.row(i).iter().zip(w).map(|(c, wj)| c * wj).sum::<f64>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn lookup_known() {
        let aapl = lookup("AAPL").unwrap();
        assert_eq!(aapl.expected_return, 0.12);
        assert_eq!(aapl.volatility, 0.22);
        assert_eq!(lookup("TSLA").unwrap().volatility, 0.35);
    }

    #[test]
    fn lookup_unknown() {
        assert_eq!(
            lookup("GOOG"),
            Err(Error::UnknownInstrument("GOOG".into()))
        );
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("aapl").is_err());
    }

    #[test]
    fn resolve_reports_first_unknown() {
        let err = resolve(&["AAPL", "XXX", "YYY"]).unwrap_err();
        assert_eq!(err, Error::UnknownInstrument("XXX".into()));
    }

    #[test]
    fn resolve_keeps_order() {
        let resolved = resolve(&["SPY", "AAPL"]).unwrap();
        assert_eq!(resolved[0].ticker, "SPY");
        assert_eq!(resolved[1].ticker, "AAPL");
    }

    #[test]
    fn universe_has_four_instruments() {
        let tickers: Vec<_> = instruments().iter().map(|i| i.ticker).collect();
        assert_eq!(tickers, ["AAPL", "MSFT", "SPY", "TSLA"]);
    }

    #[test]
    fn covariance_entries() {
        let insts = resolve(&["AAPL", "MSFT"]).unwrap();
        let cov = CovarianceMatrix::build(&insts);

        assert_eq!(cov.len(), 2);
        assert!(close(cov.get(0, 0), 0.22 * 0.22));
        assert!(close(cov.get(1, 1), 0.20 * 0.20));
        assert!(close(cov.get(0, 1), 0.3 * 0.22 * 0.20));
        assert_eq!(cov.get(0, 1), cov.get(1, 0));
    }

    #[test]
    fn covariance_repeated_ticker_uses_pairwise_correlation() {
        let insts = resolve(&["SPY", "SPY"]).unwrap();
        let cov = CovarianceMatrix::build(&insts);
        assert!(close(cov.get(0, 1), 0.3 * 0.15 * 0.15));
    }

    #[test]
    fn quadratic_form_single_asset() {
        let insts = resolve(&["MSFT"]).unwrap();
        let cov = CovarianceMatrix::build(&insts);
        assert!(close(cov.quadratic_form(&[1.0]), 0.04));
    }

    #[test]
    fn quadratic_form_two_assets() {
        let insts = resolve(&["AAPL", "SPY"]).unwrap();
        let cov = CovarianceMatrix::build(&insts);
        let w = [0.5, 0.5];
        let expected = 0.25 * 0.22 * 0.22 + 0.25 * 0.15 * 0.15 + 2.0 * 0.25 * 0.3 * 0.22 * 0.15;
        assert!(close(cov.quadratic_form(&w), expected));
    }

    #[test]
    #[should_panic]
    fn get_out_of_range_panics() {
        let insts = resolve(&["AAPL"]).unwrap();
        CovarianceMatrix::build(&insts).get(1, 0);
    }
}
