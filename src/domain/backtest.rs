//! Vectorized backtest: strategy returns against a buy-and-hold benchmark.
//!
//! Daily benchmark return[i] = close[i]/close[i-1] - 1, with 0 at the
//! first bar and whenever the previous close is not positive. Strategy
//! return[i] applies the realized position to the benchmark return.
//! Wealth curves compound from 1.0.

use crate::domain::ohlcv::PriceBar;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestResult {
    pub benchmark_returns: Vec<f64>,
    pub strategy_returns: Vec<f64>,
    pub benchmark_wealth: Vec<f64>,
    pub strategy_wealth: Vec<f64>,
    /// (final benchmark wealth - 1) * 100; 0 for an empty series.
    pub benchmark_total_return: f64,
    /// (final strategy wealth - 1) * 100; 0 for an empty series.
    pub strategy_total_return: f64,
    /// Bars spent long.
    pub holding_days: usize,
    /// Percentage of long bars with a positive strategy return; 0 when
    /// holding_days is 0.
    pub win_rate: f64,
}

pub fn run_backtest(bars: &[PriceBar], positions: &[u8]) -> BacktestResult {
    let n = bars.len();
    let mut benchmark_returns = Vec::with_capacity(n);
    let mut strategy_returns = Vec::with_capacity(n);
    let mut benchmark_wealth = Vec::with_capacity(n);
    let mut strategy_wealth = Vec::with_capacity(n);

    let mut bench_acc = 1.0;
    let mut strat_acc = 1.0;
    let mut holding_days = 0usize;
    let mut wins = 0usize;

    for i in 0..n {
        let bench_ret = if i == 0 || bars[i - 1].close <= 0.0 {
            0.0
        } else {
            bars[i].close / bars[i - 1].close - 1.0
        };

        let long = positions.get(i).copied().unwrap_or(0) == 1;
        let strat_ret = if long { bench_ret } else { 0.0 };

        bench_acc *= 1.0 + bench_ret;
        strat_acc *= 1.0 + strat_ret;

        benchmark_returns.push(bench_ret);
        strategy_returns.push(strat_ret);
        benchmark_wealth.push(bench_acc);
        strategy_wealth.push(strat_acc);

        if long {
            holding_days += 1;
            if strat_ret > 0.0 {
                wins += 1;
            }
        }
    }

    let benchmark_total_return = benchmark_wealth.last().map_or(0.0, |w| (w - 1.0) * 100.0);
    let strategy_total_return = strategy_wealth.last().map_or(0.0, |w| (w - 1.0) * 100.0);
    let win_rate = if holding_days > 0 {
        wins as f64 / holding_days as f64 * 100.0
    } else {
        0.0
    };

    BacktestResult {
        benchmark_returns,
        strategy_returns,
        benchmark_wealth,
        strategy_wealth,
        benchmark_total_return,
        strategy_total_return,
        holding_days,
        win_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn empty_series() {
        let result = run_backtest(&[], &[]);

        assert!(result.benchmark_returns.is_empty());
        assert!(result.strategy_returns.is_empty());
        assert!(result.benchmark_wealth.is_empty());
        assert!(result.strategy_wealth.is_empty());
        assert_eq!(result.holding_days, 0);
        assert!((result.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((result.benchmark_total_return - 0.0).abs() < f64::EPSILON);
        assert!((result.strategy_total_return - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_bar() {
        let bars = make_bars(&[100.0]);
        let result = run_backtest(&bars, &[0]);

        assert_eq!(result.benchmark_returns, vec![0.0]);
        assert_eq!(result.benchmark_wealth, vec![1.0]);
        assert_eq!(result.strategy_wealth, vec![1.0]);
    }

    #[test]
    fn wealth_starts_at_exactly_one() {
        let bars = make_bars(&[100.0, 110.0, 121.0]);
        let result = run_backtest(&bars, &[0, 1, 1]);

        assert_eq!(result.benchmark_wealth[0], 1.0);
        assert_eq!(result.strategy_wealth[0], 1.0);
    }

    #[test]
    fn flat_positions_keep_strategy_at_one() {
        let bars = make_bars(&[100.0, 110.0, 99.0, 120.0]);
        let result = run_backtest(&bars, &[0, 0, 0, 0]);

        for w in &result.strategy_wealth {
            assert!((w - 1.0).abs() < f64::EPSILON);
        }
        assert!((result.strategy_total_return - 0.0).abs() < f64::EPSILON);
        assert_eq!(result.holding_days, 0);
        assert!((result.win_rate - 0.0).abs() < f64::EPSILON);
        // the benchmark still moves
        assert_relative_eq!(result.benchmark_total_return, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn always_long_matches_benchmark() {
        let bars = make_bars(&[100.0, 110.0, 99.0, 108.9]);
        let result = run_backtest(&bars, &[1, 1, 1, 1]);

        assert_eq!(result.strategy_returns, result.benchmark_returns);
        assert_eq!(result.strategy_wealth, result.benchmark_wealth);
        assert!(
            (result.strategy_total_return - result.benchmark_total_return).abs() < f64::EPSILON
        );
    }

    #[test]
    fn returns_and_wealth_known_case() {
        let bars = make_bars(&[100.0, 110.0, 99.0]);
        let result = run_backtest(&bars, &[0, 1, 0]);

        assert_relative_eq!(result.benchmark_returns[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(result.benchmark_returns[2], -0.1, epsilon = 1e-12);
        assert_relative_eq!(result.strategy_returns[1], 0.1, epsilon = 1e-12);
        assert!((result.strategy_returns[2] - 0.0).abs() < f64::EPSILON);

        assert_relative_eq!(result.strategy_wealth[2], 1.1, epsilon = 1e-12);
        assert_relative_eq!(result.strategy_total_return, 10.0, epsilon = 1e-9);
        assert_relative_eq!(result.benchmark_total_return, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn win_rate_counts_long_bars_only() {
        let bars = make_bars(&[100.0, 110.0, 99.0, 108.9]);
        let result = run_backtest(&bars, &[0, 1, 1, 1]);

        // long on bars 1 (+10%), 2 (-10%), 3 (+10%): two wins of three
        assert_eq!(result.holding_days, 3);
        assert_relative_eq!(result.win_rate, 200.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn nonpositive_previous_close_gives_zero_return() {
        let bars = make_bars(&[0.0, 10.0, 11.0]);
        let result = run_backtest(&bars, &[1, 1, 1]);

        assert!((result.benchmark_returns[1] - 0.0).abs() < f64::EPSILON);
        assert_relative_eq!(result.benchmark_returns[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn short_positions_slice_is_flat() {
        let bars = make_bars(&[100.0, 110.0, 121.0]);
        let result = run_backtest(&bars, &[0, 1]);

        // the missing third entry is treated as flat
        assert!((result.strategy_returns[2] - 0.0).abs() < f64::EPSILON);
        assert_eq!(result.holding_days, 1);
    }
}
