#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use quantlab::domain::error::QuantlabError;
use quantlab::domain::market::Market;
pub use quantlab::domain::ohlcv::PriceBar;
use quantlab::ports::data_port::DataPort;
use std::cell::Cell;
use std::collections::HashMap;

/// Canned upstream provider. Series are keyed by symbol; per-symbol errors
/// and a configurable number of leading empty responses let tests drive
/// the cache and retry wrappers.
pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub fetch_calls: Cell<usize>,
    pub empty_results_before: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetch_calls: Cell::new(0),
            empty_results_before: Cell::new(0),
        }
    }

    pub fn with_series(symbol: &str, bars: Vec<PriceBar>) -> Self {
        let mut port = Self::new();
        port.data.insert(symbol.to_string(), bars);
        port
    }

    pub fn with_error(symbol: &str, reason: &str) -> Self {
        let mut port = Self::new();
        port.errors.insert(symbol.to_string(), reason.to_string());
        port
    }

    /// Return empty results for the first `n` fetches, then serve data.
    pub fn failing_first(self, n: usize) -> Self {
        self.empty_results_before.set(n);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        _market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);

        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantlabError::Provider {
                reason: reason.clone(),
            });
        }

        let remaining = self.empty_results_before.get();
        if remaining > 0 {
            self.empty_results_before.set(remaining - 1);
            return Ok(Vec::new());
        }

        let mut bars = self.data.get(symbol).cloned().unwrap_or_default();
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self, _market: Market) -> Result<Vec<String>, QuantlabError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        _market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError> {
        Ok(self
            .data
            .get(symbol)
            .and_then(|bars| match (bars.first(), bars.last()) {
                (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
                _ => None,
            }))
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Flat bars from a close series, one calendar day apart.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start_date() + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

/// Closes rising linearly from `from` to `to` over `n` bars.
pub fn rising_closes(from: f64, to: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
        .collect()
}

pub fn sample_config(cache_dir: &str) -> String {
    format!(
        "[data]\n\
         cache_dir = {}\n\
         retries = 3\n\
         retry_delay_ms = 0\n\
         \n\
         [analysis]\n\
         market = us\n\
         symbol = TSLA\n\
         start_date = 2024-01-01\n\
         end_date = 2024-03-01\n\
         \n\
         [strategy]\n\
         type = dual-ma\n\
         ma_short = 2\n\
         ma_long = 3\n",
        cache_dir
    )
}
