//! Daily price bar representation and range statistics.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Basic statistics over an analyzed date range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    /// Open of the first bar in the range.
    pub open_price: f64,
    /// Close of the last bar in the range.
    pub latest_close: f64,
    /// latest_close - open_price
    pub change: f64,
    /// change as a percentage of open_price
    pub change_pct: f64,
    /// Highest high over the range.
    pub period_high: f64,
}

impl RangeSummary {
    /// None when `bars` is empty.
    pub fn from_bars(bars: &[PriceBar]) -> Option<RangeSummary> {
        let first = bars.first()?;
        let last = bars.last()?;
        let change = last.close - first.open;
        let change_pct = if first.open > 0.0 {
            change / first.open * 100.0
        } else {
            0.0
        };
        let period_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        Some(RangeSummary {
            open_price: first.open,
            latest_close: last.close,
            change,
            change_pct,
            period_high,
        })
    }
}
