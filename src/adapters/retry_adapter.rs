//! Bounded retry wrapper for a flaky upstream provider.
//!
//! An error or an empty result triggers another attempt after a pause,
//! with a warning on stderr. Exhausting all attempts yields an empty
//! result, not an error; downstream treats that as "no data".

use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::time::Duration;

pub struct RetryingDataAdapter<P: DataPort> {
    inner: P,
    attempts: usize,
    delay: Duration,
}

impl<P: DataPort> RetryingDataAdapter<P> {
    pub fn new(inner: P, attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl<P: DataPort> DataPort for RetryingDataAdapter<P> {
    fn fetch_daily(
        &self,
        market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError> {
        for attempt in 1..=self.attempts {
            match self.inner.fetch_daily(market, symbol, start_date, end_date) {
                Ok(bars) if !bars.is_empty() => return Ok(bars),
                Ok(_) => {
                    eprintln!(
                        "warning: [attempt {}/{}] no data for {} on {}",
                        attempt, self.attempts, symbol, market
                    );
                }
                Err(e) => {
                    eprintln!(
                        "warning: [attempt {}/{}] fetch of {} on {} failed: {}",
                        attempt, self.attempts, symbol, market, e
                    );
                }
            }
            if attempt < self.attempts && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }
        eprintln!(
            "warning: giving up on {} on {} after {} attempts",
            symbol, market, self.attempts
        );
        Ok(Vec::new())
    }

    fn list_symbols(&self, market: Market) -> Result<Vec<String>, QuantlabError> {
        self.inner.list_symbols(market)
    }

    fn data_range(
        &self,
        market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError> {
        self.inner.data_range(market, symbol)
    }
}
