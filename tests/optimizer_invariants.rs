//! Optimizer and statistics invariants over the fixed instrument universe.

use gridfolio::{
    CORRELATION, Error, GRID_DIVISIONS, Objective, Optimizer, SimplexGrid, compute_stats,
    instruments, optimize, optimize_named,
};

const ALL: [&str; 4] = ["AAPL", "MSFT", "SPY", "TSLA"];

fn weight_sum(w: &[f64]) -> f64 {
    w.iter().sum()
}

// === Statistics ===

#[test]
fn reference_portfolio_expected_return() {
    let stats = compute_stats(&["AAPL", "MSFT", "SPY"], &[0.3, 0.4, 0.3]).unwrap();
    let expected = 0.3 * 0.12 + 0.4 * 0.10 + 0.3 * 0.08;
    assert!((stats.expected_annual_return - expected).abs() < 1e-12);
    assert_eq!(stats.weights, [0.3, 0.4, 0.3], "weights already sum to 1");
}

#[test]
fn repeated_instrument_volatility() {
    for inst in instruments() {
        for n in 1..=4usize {
            let tickers = vec![inst.ticker; n];
            let weights = vec![1.0 / n as f64; n];
            let stats = compute_stats(&tickers, &weights).unwrap();

            let scale = ((1.0 + (n as f64 - 1.0) * CORRELATION) / n as f64).sqrt();
            let expected = inst.volatility * scale;
            assert!(
                (stats.annual_volatility - expected).abs() < 1e-12,
                "{} x{n}: got={} expected={expected}",
                inst.ticker,
                stats.annual_volatility
            );
        }
    }
}

#[test]
fn diversification_lowers_volatility() {
    let stats = compute_stats(&["AAPL", "TSLA"], &[0.5, 0.5]).unwrap();
    let weighted_avg = 0.5 * 0.22 + 0.5 * 0.35;
    assert!(stats.annual_volatility < weighted_avg);
}

#[test]
fn error_taxonomy() {
    let empty: Vec<String> = Vec::new();

    assert!(matches!(compute_stats(&empty, &[]), Err(Error::InvalidInput(_))));
    assert!(matches!(
        optimize(&empty, Objective::MinVariance),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        compute_stats(&["AAPL"], &[0.5, 0.5]),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        compute_stats(&["AAPL", "SPY"], &[1.5, -0.5]),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        compute_stats(&["BTC"], &[1.0]),
        Err(Error::UnknownInstrument(_))
    ));
    assert!(matches!(
        optimize(&["BTC"], Objective::MaxSharpe),
        Err(Error::UnknownInstrument(_))
    ));
    assert!(matches!(
        optimize_named(&["AAPL"], "bogus_mode"),
        Err(Error::InvalidInput(_))
    ));
}

// === Optimizer ===

#[test]
fn min_variance_three_assets() {
    let tickers = ["AAPL", "MSFT", "SPY"];
    let best = optimize(&tickers, Objective::MinVariance).unwrap();
    let equal = compute_stats(&tickers, &[1.0 / 3.0; 3]).unwrap();

    assert!((weight_sum(&best.stats.weights) - 1.0).abs() < 1e-6);
    assert!(best.stats.annual_volatility <= equal.annual_volatility);
    assert_eq!(best.mode, Objective::MinVariance);
}

#[test]
fn min_variance_is_grid_minimum() {
    let best = optimize(&ALL, Objective::MinVariance).unwrap();

    for w in SimplexGrid::new(ALL.len(), GRID_DIVISIONS) {
        let s = compute_stats(&ALL, &w).unwrap();
        assert!(
            best.stats.annual_volatility <= s.annual_volatility,
            "{w:?} beats the optimizer"
        );
    }
}

#[test]
fn min_variance_favours_lowest_volatility() {
    let best = optimize(&ALL, Objective::MinVariance).unwrap();
    let spy = best.stats.weights[2];
    let tsla = best.stats.weights[3];
    assert!(spy > tsla, "SPY={spy} TSLA={tsla}");
}

#[test]
fn single_asset_max_sharpe() {
    let best = optimize(&["AAPL"], Objective::MaxSharpe).unwrap();
    assert_eq!(best.stats.weights, [1.0]);
    assert!((best.stats.sharpe_ratio - 0.4545).abs() < 1e-4);
}

#[test]
fn single_asset_min_variance() {
    let best = optimize(&["SPY"], Objective::MinVariance).unwrap();
    assert_eq!(best.stats.weights, [1.0]);
    assert!((best.stats.annual_volatility - 0.15).abs() < 1e-12);
}

#[test]
fn max_sharpe_beats_min_variance_on_sharpe() {
    let sharpe = optimize(&ALL, Objective::MaxSharpe).unwrap();
    let minvar = optimize(&ALL, Objective::MinVariance).unwrap();
    assert!(sharpe.stats.sharpe_ratio >= minvar.stats.sharpe_ratio);
    assert!(minvar.stats.annual_volatility <= sharpe.stats.annual_volatility);
}

#[test]
fn results_are_reproducible() {
    let a = optimize(&ALL, Objective::MaxSharpe).unwrap();
    let b = optimize(&ALL, Objective::MaxSharpe).unwrap();
    assert_eq!(a, b);
}

#[test]
fn ticker_order_is_preserved() {
    let best = optimize(&["TSLA", "SPY"], Objective::MinVariance).unwrap();
    assert_eq!(best.stats.tickers, ["TSLA", "SPY"]);
    assert!(best.stats.weights[1] > best.stats.weights[0]);
}

#[test]
fn optimizer_respects_asset_cap() {
    let opt = Optimizer::new().with_max_assets(3);
    assert!(matches!(
        opt.optimize(&ALL, Objective::MinVariance),
        Err(Error::InvalidInput(_))
    ));
}
