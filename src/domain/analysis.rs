//! One-call analysis pipeline: indicators, signals, backtest, summary.
//!
//! Each call is independent and stateless; identical bars and parameters
//! produce identical reports.

use std::collections::HashMap;

use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::indicator::{
    calculate_ema, calculate_macd, calculate_rsi, calculate_sma, IndicatorSeries, IndicatorType,
};
use crate::domain::ohlcv::{PriceBar, RangeSummary};
use crate::domain::signal::{generate_signals, SignalEvent};
use crate::domain::strategy::StrategyParams;

/// Everything the presentation layer needs for one symbol request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub bars: Vec<PriceBar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    pub events: Vec<SignalEvent>,
    /// Holding state as of each bar's close.
    pub signal: Vec<u8>,
    /// Realized positions (signal lagged one bar).
    pub positions: Vec<u8>,
    pub backtest: BacktestResult,
    pub summary: Option<RangeSummary>,
}

/// Compute the indicator series a strategy variant consumes.
pub fn compute_indicators(
    bars: &[PriceBar],
    params: &StrategyParams,
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut indicators = HashMap::new();
    for indicator_type in params.indicator_types() {
        let series = match indicator_type {
            IndicatorType::Sma(window) => calculate_sma(bars, window),
            IndicatorType::Ema(span) => calculate_ema(bars, span),
            IndicatorType::Rsi(period) => calculate_rsi(bars, period),
            IndicatorType::Macd { fast, slow, signal } => calculate_macd(bars, fast, slow, signal),
        };
        indicators.insert(indicator_type, series);
    }
    indicators
}

pub fn analyze(bars: Vec<PriceBar>, params: &StrategyParams) -> AnalysisReport {
    let indicators = compute_indicators(&bars, params);
    let signals = generate_signals(&bars, params, &indicators);
    let backtest = run_backtest(&bars, &signals.positions);
    let summary = RangeSummary::from_bars(&bars);

    AnalysisReport {
        indicators,
        events: signals.events,
        signal: signals.signal,
        positions: signals.positions,
        backtest,
        summary,
        bars,
    }
}
