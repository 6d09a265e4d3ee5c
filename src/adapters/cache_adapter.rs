//! Cache-first wrapper around an upstream data provider.
//!
//! Serves from the local CSV store when it covers any of the requested
//! range; otherwise delegates to the inner provider, materializes whatever
//! it returned, and re-filters to the request. A store that fails to cover
//! the range at all falls through to the provider.

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CachingDataAdapter<P: DataPort> {
    store: CsvDataAdapter,
    inner: P,
}

impl<P: DataPort> CachingDataAdapter<P> {
    pub fn new(cache_dir: PathBuf, inner: P) -> Self {
        Self {
            store: CsvDataAdapter::new(cache_dir),
            inner,
        }
    }
}

impl<P: DataPort> DataPort for CachingDataAdapter<P> {
    fn fetch_daily(
        &self,
        market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError> {
        let cached = self
            .store
            .fetch_daily(market, symbol, start_date, end_date)?;
        if !cached.is_empty() {
            return Ok(cached);
        }

        let fetched = self.inner.fetch_daily(market, symbol, start_date, end_date)?;
        if fetched.is_empty() {
            return Ok(fetched);
        }

        self.store.write_daily(market, symbol, &fetched)?;
        Ok(fetched
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self, market: Market) -> Result<Vec<String>, QuantlabError> {
        self.store.list_symbols(market)
    }

    fn data_range(
        &self,
        market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError> {
        self.store.data_range(market, symbol)
    }
}
