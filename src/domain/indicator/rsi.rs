//! RSI (Relative Strength Index) indicator.
//!
//! Average gain and loss are simple rolling means over the trailing n
//! price changes, not Wilder's recursive smoothing.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 (all-gain window or a fully flat one): RSI = 100,
//! keeping the output bounded in [0, 100] with no NaN or infinity.
//!
//! Warmup: first n bars are invalid (differencing consumes one bar, so
//! index n is the first with n changes behind it).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        let values: Vec<IndicatorPoint> = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect();

        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    // gains[i]/losses[i] describe the change into bar i; index 0 has none
    let mut gains = vec![0.0; bars.len()];
    let mut losses = vec![0.0; bars.len()];
    for i in 1..bars.len() {
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        gain_sum += gains[i];
        loss_sum += losses[i];
        if i > period {
            gain_sum -= gains[i - period];
            loss_sum -= losses[i - period];
        }

        if i < period {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
        } else {
            let avg_gain = gain_sum / period as f64;
            let avg_loss = loss_sum / period as f64;
            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
            };
            values.push(IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(rsi),
            });
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
