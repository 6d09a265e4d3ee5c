//! Upstream data provider port.
//!
//! The contract of the provider boundary: bars come back sorted ascending
//! by date and filtered inclusively to the requested range. An empty vector
//! means "no data for this symbol/range" and is not an error.

use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_daily(
        &self,
        market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError>;

    /// Symbols the provider has series for on `market`.
    fn list_symbols(&self, market: Market) -> Result<Vec<String>, QuantlabError>;

    /// First date, last date and bar count of the stored series, or `None`
    /// when the provider has nothing for the symbol.
    fn data_range(
        &self,
        market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError>;
}

impl<P: DataPort + ?Sized> DataPort for &P {
    fn fetch_daily(
        &self,
        market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError> {
        (**self).fetch_daily(market, symbol, start_date, end_date)
    }

    fn list_symbols(&self, market: Market) -> Result<Vec<String>, QuantlabError> {
        (**self).list_symbols(market)
    }

    fn data_range(
        &self,
        market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError> {
        (**self).data_range(market, symbol)
    }
}
