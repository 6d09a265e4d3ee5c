//! Local CSV store: the terminal data adapter.
//!
//! One file per series, `<prefix>_<symbol>_daily.csv` under a base
//! directory, with a `date,open,high,low,close,volume` header row. A
//! missing file is "no data" (empty result); a malformed row in an
//! existing file is a provider error.

use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn series_path(&self, market: Market, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}_daily.csv", market.file_prefix(), symbol))
    }

    fn read_series(&self, market: Market, symbol: &str) -> Result<Vec<PriceBar>, QuantlabError> {
        let path = self.series_path(market, symbol);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(QuantlabError::Provider {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantlabError::Provider {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(parse_record(&record)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    /// Materialize a fetched series in the store, replacing any existing
    /// file for the symbol.
    pub fn write_daily(
        &self,
        market: Market,
        symbol: &str,
        bars: &[PriceBar],
    ) -> Result<(), QuantlabError> {
        fs::create_dir_all(&self.base_path).map_err(|e| QuantlabError::Provider {
            reason: format!("failed to create {}: {}", self.base_path.display(), e),
        })?;

        let path = self.series_path(market, symbol);
        let mut wtr = csv::Writer::from_path(&path).map_err(|e| QuantlabError::Provider {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;

        wtr.write_record(["date", "open", "high", "low", "close", "volume"])
            .map_err(|e| QuantlabError::Provider {
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;
        for bar in bars {
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(|e| QuantlabError::Provider {
                reason: format!("failed to write {}: {}", path.display(), e),
            })?;
        }
        wtr.flush().map_err(|e| QuantlabError::Provider {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        Ok(())
    }
}

fn parse_record(record: &csv::StringRecord) -> Result<PriceBar, QuantlabError> {
    let field = |idx: usize, name: &str| {
        record.get(idx).ok_or_else(|| QuantlabError::Provider {
            reason: format!("missing {} column", name),
        })
    };

    let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
        QuantlabError::Provider {
            reason: format!("invalid date value: {}", e),
        }
    })?;

    let number = |idx: usize, name: &str| -> Result<f64, QuantlabError> {
        field(idx, name)?
            .parse()
            .map_err(|e| QuantlabError::Provider {
                reason: format!("invalid {} value: {}", name, e),
            })
    };

    let volume: i64 = field(5, "volume")?
        .parse()
        .map_err(|e| QuantlabError::Provider {
            reason: format!("invalid volume value: {}", e),
        })?;

    Ok(PriceBar {
        date,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume,
    })
}

impl DataPort for CsvDataAdapter {
    fn fetch_daily(
        &self,
        market: Market,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, QuantlabError> {
        let mut bars = self.read_series(market, symbol)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self, market: Market) -> Result<Vec<String>, QuantlabError> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(QuantlabError::Provider {
                    reason: format!(
                        "failed to read directory {}: {}",
                        self.base_path.display(),
                        e
                    ),
                });
            }
        };

        let prefix = format!("{}_", market.file_prefix());
        let suffix = "_daily.csv";
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| QuantlabError::Provider {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.starts_with(&prefix) && name_str.ends_with(suffix) {
                let symbol = &name_str[prefix.len()..name_str.len() - suffix.len()];
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        market: Market,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, QuantlabError> {
        let bars = self.read_series(market, symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("US_TSLA_daily.csv"), csv_content).unwrap();
        fs::write(
            path.join("US_AAPL_daily.csv"),
            "date,open,high,low,close,volume\n",
        )
        .unwrap();
        fs::write(
            path.join("A_600519_daily.csv"),
            "date,open,high,low,close,volume\n",
        )
        .unwrap();

        (dir, path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_daily_returns_parsed_bars() {
        let (_dir, path) = setup_store();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily(Market::Us, "TSLA", date(2024, 1, 15), date(2024, 1, 17))
            .unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(2024, 1, 15));
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn fetch_daily_filters_inclusively() {
        let (_dir, path) = setup_store();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily(Market::Us, "TSLA", date(2024, 1, 16), date(2024, 1, 16))
            .unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(2024, 1, 16));
    }

    #[test]
    fn missing_file_is_no_data_not_error() {
        let (_dir, path) = setup_store();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily(Market::Us, "XYZ", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        assert!(bars.is_empty());
    }

    #[test]
    fn malformed_row_is_provider_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("US_BAD_daily.csv"),
            "date,open,high,low,close,volume\n2024-01-15,oops,110,90,105,50000\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);

        let result = adapter.fetch_daily(Market::Us, "BAD", date(2024, 1, 1), date(2024, 1, 31));

        assert!(matches!(result, Err(QuantlabError::Provider { .. })));
    }

    #[test]
    fn unsorted_rows_come_back_sorted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        fs::write(
            path.join("US_X_daily.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-17,1,1,1,1,1\n\
             2024-01-15,1,1,1,1,1\n\
             2024-01-16,1,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(path);

        let bars = adapter
            .fetch_daily(Market::Us, "X", date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();

        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 1, 16), date(2024, 1, 17)]
        );
    }

    #[test]
    fn list_symbols_is_market_scoped() {
        let (_dir, path) = setup_store();
        let adapter = CsvDataAdapter::new(path);

        assert_eq!(adapter.list_symbols(Market::Us).unwrap(), vec!["AAPL", "TSLA"]);
        assert_eq!(adapter.list_symbols(Market::AShare).unwrap(), vec!["600519"]);
    }

    #[test]
    fn data_range_reports_coverage() {
        let (_dir, path) = setup_store();
        let adapter = CsvDataAdapter::new(path);

        let range = adapter.data_range(Market::Us, "TSLA").unwrap();
        assert_eq!(range, Some((date(2024, 1, 15), date(2024, 1, 17), 3)));

        assert_eq!(adapter.data_range(Market::Us, "AAPL").unwrap(), None);
        assert_eq!(adapter.data_range(Market::Us, "MISSING").unwrap(), None);
    }

    #[test]
    fn write_daily_round_trips_through_fetch() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let bars = vec![
            PriceBar {
                date: date(2024, 2, 1),
                open: 10.0,
                high: 11.0,
                low: 9.5,
                close: 10.5,
                volume: 1200,
            },
            PriceBar {
                date: date(2024, 2, 2),
                open: 10.5,
                high: 12.0,
                low: 10.0,
                close: 11.5,
                volume: 1500,
            },
        ];

        adapter.write_daily(Market::AShare, "600519", &bars).unwrap();
        let loaded = adapter
            .fetch_daily(Market::AShare, "600519", date(2024, 2, 1), date(2024, 2, 2))
            .unwrap();

        assert_eq!(loaded, bars);
    }
}
