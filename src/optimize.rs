//! Exhaustive grid-search optimizer over long-only weight vectors.
//!
//! Each weight takes one of 21 levels `{0.00, 0.05, ..., 1.00}` and a
//! candidate is feasible when its weights sum to 1. Levels are held as
//! integer indices `k / 20`, so feasibility is the exact test
//! `Σ k_i == 20` rather than a floating-point tolerance.
//!
//! # Iteration order
//!
//! Candidates are visited in ascending lexicographic order of their level
//! indices, first ticker most significant. For two tickers:
//!
//! ```text
//! (0.00, 1.00), (0.05, 0.95), (0.10, 0.90), ..., (1.00, 0.00)
//! ```
//!
//! This is the order a filtered cartesian product of the levels would
//! produce, without visiting the 21ⁿ infeasible points. The selection keeps
//! the first candidate on ties, so the order decides which of two equally
//! good allocations is returned.
//!
//! # Cost
//!
//! The feasible set has `C(20 + n - 1, n - 1)` members: 21 for one ticker,
//! 1771 for four, 53 130 for six. Every member is evaluated, so cost grows
//! combinatorially with the number of tickers (repeated tickers count).
//! [`Optimizer`] refuses lists longer than its `max_assets` limit.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::market::{self, CovarianceMatrix, Instrument, RISK_FREE_RATE};
use crate::stats::{PortfolioStats, compute_stats, evaluate};

/// Number of grid steps between 0 and 1 (step = 1 / 20 = 0.05).
pub const GRID_DIVISIONS: u32 = 20;

/// Default cap on the number of tickers accepted by the optimizer.
pub const DEFAULT_MAX_ASSETS: usize = 6;

/// What the grid search optimizes for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Objective {
    /// Lowest portfolio volatility.
    MinVariance,
    /// Highest Sharpe ratio.
    MaxSharpe,
}

impl Objective {
    pub const ALL: [Objective; 2] = [Objective::MinVariance, Objective::MaxSharpe];

    /// Wire name, as used in the optimize route.
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::MinVariance => "min_variance",
            Objective::MaxSharpe => "max_sharpe",
        }
    }

    /// Value to minimize for a candidate, or `None` to skip it.
    fn score(self, expected_return: f64, volatility: f64) -> Option<f64> {
        match self {
            Objective::MinVariance => Some(volatility),
            Objective::MaxSharpe if volatility == 0.0 => None,
            Objective::MaxSharpe => Some(-((expected_return - RISK_FREE_RATE) / volatility)),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "min_variance" => Ok(Objective::MinVariance),
            "max_sharpe" => Ok(Objective::MaxSharpe),
            _ => Err(Error::invalid(
                "mode must be 'min_variance' or 'max_sharpe'",
            )),
        }
    }
}

/// Winning allocation, with the objective that selected it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizedPortfolio {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub stats: PortfolioStats,
    pub mode: Objective,
}

/// Lexicographic enumeration of the weight vectors on the unit simplex grid.
///
/// Yields every `n`-vector whose entries are multiples of `1 / divisions`
/// and sum to 1. See the module docs for the order.
#[derive(Clone, Debug)]
pub struct SimplexGrid {
    divisions: u32,
    next: Option<Vec<u32>>,
}

impl SimplexGrid {
    /// Grid over `n` positions with `divisions` steps per unit.
    ///
    /// Empty when `n == 0`.
    pub fn new(n: usize, divisions: u32) -> Self {
        let next = (n > 0).then(|| {
            let mut first = vec![0; n];
            first[n - 1] = divisions;
            first
        });
        Self { divisions, next }
    }

    /// Number of vectors the grid yields: `C(divisions + n - 1, n - 1)`.
    pub fn candidate_count(n: usize, divisions: u32) -> u64 {
        if n == 0 {
            return 0;
        }
        let d = u64::from(divisions);
        let k = (n - 1) as u64;
        // Multiplicative form keeps every intermediate an exact integer.
        (1..=k).fold(1u64, |acc, i| acc * (d + i) / i)
    }

    fn advance(levels: &mut [u32]) -> bool {
        let n = levels.len();
        // Rightmost nonzero entry past the first; all mass on the first
        // position is the last vector.
        let Some(k) = (1..n).rev().find(|&j| levels[j] > 0) else {
            return false;
        };
        let carry = levels[k] - 1;
        levels[k - 1] += 1;
        levels[k] = 0;
        levels[n - 1] = carry;
        true
    }
}

impl Iterator for SimplexGrid {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let levels = self.next.take()?;
        let scale = f64::from(self.divisions);
        let weights = levels.iter().map(|&k| f64::from(k) / scale).collect();

        let mut following = levels;
        if Self::advance(&mut following) {
            self.next = Some(following);
        }
        Some(weights)
    }
}

/// Grid-search optimizer with a cap on problem size.
///
/// # Example
///
/// ```
/// use gridfolio::{Objective, Optimizer};
///
/// let result = Optimizer::new().optimize(&["AAPL"], Objective::MaxSharpe).unwrap();
/// assert_eq!(result.stats.weights, vec![1.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Optimizer {
    max_assets: usize,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self {
            max_assets: DEFAULT_MAX_ASSETS,
        }
    }

    /// Override the ticker cap. Values below 1 are raised to 1.
    pub fn with_max_assets(mut self, max_assets: usize) -> Self {
        self.max_assets = max_assets.max(1);
        self
    }

    pub fn max_assets(&self) -> usize {
        self.max_assets
    }

    /// Find the grid allocation of `tickers` that best meets `objective`.
    pub fn optimize<S: AsRef<str>>(
        &self,
        tickers: &[S],
        objective: Objective,
    ) -> Result<OptimizedPortfolio> {
        let instruments = self.check_tickers(tickers)?;
        self.run(tickers, &instruments, objective)
    }

    /// Like [`optimize`](Self::optimize), with the objective given by name.
    ///
    /// Tickers are validated before the name is parsed.
    pub fn optimize_named<S: AsRef<str>>(
        &self,
        tickers: &[S],
        mode: &str,
    ) -> Result<OptimizedPortfolio> {
        let instruments = self.check_tickers(tickers)?;
        let objective = mode.parse()?;
        self.run(tickers, &instruments, objective)
    }

    fn check_tickers<S: AsRef<str>>(&self, tickers: &[S]) -> Result<Vec<&'static Instrument>> {
        let instruments = market::resolve(tickers)?;
        if instruments.is_empty() {
            return Err(Error::invalid("Must provide at least 1 ticker."));
        }
        if instruments.len() > self.max_assets {
            return Err(Error::InvalidInput(format!(
                "at most {} tickers can be optimized, got {}",
                self.max_assets,
                instruments.len()
            )));
        }
        Ok(instruments)
    }

    fn run<S: AsRef<str>>(
        &self,
        tickers: &[S],
        instruments: &[&Instrument],
        objective: Objective,
    ) -> Result<OptimizedPortfolio> {
        let mu = market::expected_returns(instruments);
        let cov = CovarianceMatrix::build(instruments);
        let grid = SimplexGrid::new(instruments.len(), GRID_DIVISIONS);

        let score = |w: &[f64]| {
            let eval = evaluate(&mu, &cov, w);
            objective.score(eval.expected_return, eval.volatility)
        };

        let Some(best) = search(grid, score)? else {
            return Err(Error::NoFeasibleSolution(format!(
                "every candidate was skipped for {objective}"
            )));
        };

        let stats = compute_stats(tickers, &best)?;
        Ok(OptimizedPortfolio {
            stats,
            mode: objective,
        })
    }
}

/// Optimize with the default [`Optimizer`].
pub fn optimize<S: AsRef<str>>(tickers: &[S], objective: Objective) -> Result<OptimizedPortfolio> {
    Optimizer::new().optimize(tickers, objective)
}

/// Optimize with the default [`Optimizer`], objective given by name.
pub fn optimize_named<S: AsRef<str>>(tickers: &[S], mode: &str) -> Result<OptimizedPortfolio> {
    Optimizer::new().optimize_named(tickers, mode)
}

/// Scan `candidates`, returning the one with the smallest score.
///
/// `score` returns `None` to skip a candidate. Comparison is strict, so the
/// earliest of several equal scores wins. `Ok(None)` means candidates
/// existed but all were skipped; an empty candidate set is an error.
#[cfg(not(feature = "parallel"))]
fn search<I, F>(candidates: I, score: F) -> Result<Option<Vec<f64>>>
where
    I: Iterator<Item = Vec<f64>>,
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut seen = false;
    let mut best: Option<(f64, Vec<f64>)> = None;

    for w in candidates {
        seen = true;
        let Some(value) = score(&w) else {
            continue;
        };
        if best.as_ref().is_none_or(|(b, _)| value < *b) {
            best = Some((value, w));
        }
    }

    if !seen {
        return Err(Error::NoFeasibleSolution("weight grid is empty".into()));
    }
    Ok(best.map(|(_, w)| w))
}

/// Parallel variant: candidates are scored on the rayon pool and reduced by
/// `(score, position)`, which picks the same winner as the sequential scan.
#[cfg(feature = "parallel")]
fn search<I, F>(candidates: I, score: F) -> Result<Option<Vec<f64>>>
where
    I: Iterator<Item = Vec<f64>>,
    F: Fn(&[f64]) -> Option<f64> + Sync,
{
    use rayon::prelude::*;

    let all: Vec<Vec<f64>> = candidates.collect();
    if all.is_empty() {
        return Err(Error::NoFeasibleSolution("weight grid is empty".into()));
    }

    let best = all
        .par_iter()
        .enumerate()
        .filter_map(|(i, w)| score(w).map(|v| (v, i)))
        .reduce_with(|a, b| if b.0 < a.0 || (b.0 == a.0 && b.1 < a.1) { b } else { a });

    Ok(best.map(|(_, i)| all[i].clone()))
}
