//! # gridfolio
//!
//! Portfolio risk/return statistics and a brute-force optimizer over a fixed
//! universe of four instruments.
//!
//! ## Features
//!
//! - **Market model**: static expected returns and volatilities, synthetic
//!   covariance with a uniform 0.3 pairwise correlation
//! - **Statistics**: expected return, volatility, Sharpe ratio for any
//!   long-only weighting
//! - **Grid search**: exhaustive search over weights in 0.05 steps for the
//!   minimum-volatility or maximum-Sharpe allocation
//! - **Deterministic**: candidates are visited in a fixed lexicographic order,
//!   so ties always resolve the same way
//!
//! ## Quick Start
//!
//! ```
//! use gridfolio::{compute_stats, optimize, Objective};
//!
//! let stats = compute_stats(&["AAPL", "MSFT", "SPY"], &[0.3, 0.4, 0.3]).unwrap();
//! assert!((stats.expected_annual_return - 0.100).abs() < 1e-12);
//!
//! let best = optimize(&["AAPL", "MSFT", "SPY"], Objective::MinVariance).unwrap();
//! let total: f64 = best.stats.weights.iter().sum();
//! assert!((total - 1.0).abs() < 1e-6);
//! assert!(best.stats.annual_volatility <= stats.annual_volatility);
//! ```
//!
//! ## Instrument Universe
//!
//! | Ticker | Expected return | Volatility |
//! |--------|-----------------|------------|
//! | AAPL   | 12% | 22% |
//! | MSFT   | 10% | 20% |
//! | SPY    | 8%  | 15% |
//! | TSLA   | 18% | 35% |
//!
//! Anything else is rejected with [`Error::UnknownInstrument`]:
//!
//! ```
//! use gridfolio::{compute_stats, Error};
//!
//! let err = compute_stats(&["GOOG"], &[1.0]).unwrap_err();
//! assert_eq!(err, Error::UnknownInstrument("GOOG".into()));
//! ```
//!
//! ## Weights
//!
//! Weights must be non-negative. If they do not already sum to 1 they are
//! rescaled by their sum:
//!
//! ```
//! use gridfolio::compute_stats;
//!
//! let stats = compute_stats(&["AAPL", "MSFT"], &[3.0, 1.0]).unwrap();
//! assert_eq!(stats.weights, vec![0.75, 0.25]);
//! ```
//!
//! ## Objectives by Name
//!
//! The HTTP layer receives the objective as a string:
//!
//! ```
//! use gridfolio::{optimize_named, Objective};
//!
//! let best = optimize_named(&["AAPL"], "max_sharpe").unwrap();
//! assert_eq!(best.mode, Objective::MaxSharpe);
//! assert!(optimize_named(&["AAPL"], "bogus_mode").is_err());
//! ```

mod error;
pub mod market;
pub mod optimize;
pub mod stats;

// Re-export public API
pub use error::{Error, Result};
pub use market::{CORRELATION, CovarianceMatrix, Instrument, RISK_FREE_RATE, instruments, lookup};
pub use optimize::{
    DEFAULT_MAX_ASSETS, GRID_DIVISIONS, Objective, OptimizedPortfolio, Optimizer, SimplexGrid,
    optimize, optimize_named,
};
pub use stats::{PortfolioStats, compute_stats, normalize_weights, sharpe_ratio};
