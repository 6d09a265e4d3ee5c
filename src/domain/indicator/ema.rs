//! Exponential Moving Average indicator.
//!
//! alpha = 2/(n+1), seeded with the first value, then
//! EMA[i] = V[i]*alpha + EMA[i-1]*(1-alpha). No bias correction, so the
//! series is defined from the first bar onward (no warmup).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

/// EMA over a raw slice. Exists separately because the MACD signal line
/// smooths the DIF vector rather than a bar series.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &v in values {
        let ema = match prev {
            None => v,
            Some(p) => v * alpha + p * (1.0 - alpha),
        };
        out.push(ema);
        prev = Some(ema);
    }

    out
}

pub fn calculate_ema(bars: &[PriceBar], span: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ema_values(&closes, span)
        .into_iter()
        .zip(bars)
        .map(|(ema, bar)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn ema_seed_is_first_value() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values[0].valid);
        assert!((series.value_at(0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_defined_from_first_bar() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.len(), 5);
        for point in &series.values {
            assert!(point.valid);
        }
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        // alpha = 2/4 = 0.5
        let e0 = 10.0;
        let e1 = 20.0 * 0.5 + e0 * 0.5;
        let e2 = 30.0 * 0.5 + e1 * 0.5;

        assert!((series.value_at(0) - e0).abs() < f64::EPSILON);
        assert!((series.value_at(1) - e1).abs() < f64::EPSILON);
        assert!((series.value_at(2) - e2).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_span_1_tracks_input() {
        // alpha = 2/2 = 1, so the EMA equals the input everywhere
        let values = ema_values(&[10.0, 25.0, 5.0], 1);
        assert!((values[0] - 10.0).abs() < f64::EPSILON);
        assert!((values[1] - 25.0).abs() < f64::EPSILON);
        assert!((values[2] - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let series = calculate_ema(&bars, 3);

        for i in 0..4 {
            assert!((series.value_at(i) - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_values_empty() {
        assert!(ema_values(&[], 5).is_empty());
    }

    #[test]
    fn ema_empty_bars() {
        let bars: Vec<PriceBar> = vec![];
        let series = calculate_ema(&bars, 3);
        assert!(series.is_empty());
    }

    #[test]
    fn ema_indicator_type() {
        let bars = make_bars(&[10.0]);
        let series = calculate_ema(&bars, 12);
        assert_eq!(series.indicator_type, IndicatorType::Ema(12));
    }
}
