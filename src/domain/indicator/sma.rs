//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(C[i-n+1] .. C[i]), computed with a sliding window sum.
//! Warmup: first (n-1) bars are invalid. A window of 0 yields an
//! all-invalid series of the input length.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], window: usize) -> IndicatorSeries {
    if window == 0 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            })
            .collect();
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(window),
            values,
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= window {
            sum -= bars[i - window].close;
        }

        if i + 1 < window {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
        } else {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Simple(sum / window as f64),
            });
        }
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values,
    }
}
