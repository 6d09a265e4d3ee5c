//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! DIF = EMA(fast) - EMA(slow)
//! DEA = EMA(signal span) of DIF
//! Histogram = 2 * (DIF - DEA)
//!
//! Default parameters: fast=12, slow=26, signal=9. The component EMAs are
//! seeded with their first value, so every index carries a value (no
//! warmup).

use crate::domain::indicator::{
    ema_values, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_span,
    };

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);
    let dif: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let dea = ema_values(&dif, signal_span);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Macd {
                dif: dif[i],
                dea: dea[i],
                histogram: 2.0 * (dif[i] - dea[i]),
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
