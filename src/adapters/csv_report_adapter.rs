//! CSV report writer: the augmented per-bar table of an analysis run.
//!
//! Columns are date, OHLCV, the indicator columns of the strategy variant,
//! the signal/position pair, and the per-bar return and wealth series.
//! Invalid indicator points serialize as empty cells, never as zero.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::QuantlabError;
use crate::domain::indicator::macd::DEFAULT_SIGNAL;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::strategy::StrategyParams;
use crate::ports::report_port::ReportPort;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn simple_cell(series: Option<&IndicatorSeries>, index: usize) -> String {
    match series.and_then(|s| s.values.get(index)) {
        Some(p) if p.valid => match p.value {
            IndicatorValue::Simple(v) => format!("{:.4}", v),
            IndicatorValue::Macd { .. } => String::new(),
        },
        _ => String::new(),
    }
}

fn macd_cells(series: Option<&IndicatorSeries>, index: usize) -> [String; 3] {
    match series.and_then(|s| s.values.get(index)) {
        Some(p) if p.valid => match p.value {
            IndicatorValue::Macd {
                dif,
                dea,
                histogram,
            } => [
                format!("{:.4}", dif),
                format!("{:.4}", dea),
                format!("{:.4}", histogram),
            ],
            IndicatorValue::Simple(_) => [String::new(), String::new(), String::new()],
        },
        _ => [String::new(), String::new(), String::new()],
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        report: &AnalysisReport,
        params: &StrategyParams,
        output_path: &str,
    ) -> Result<(), QuantlabError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| QuantlabError::Provider {
            reason: format!("failed to create report {}: {}", output_path, e),
        })?;

        let write_err = |e: csv::Error| QuantlabError::Provider {
            reason: format!("failed to write report {}: {}", output_path, e),
        };

        let mut header = vec!["date", "open", "high", "low", "close", "volume"];
        match params {
            StrategyParams::DualMa { .. } => header.extend(["ma_short", "ma_long"]),
            StrategyParams::MacdRsi { .. } => header.extend(["dif", "dea", "macd", "rsi"]),
        }
        header.extend([
            "signal",
            "position",
            "benchmark_return",
            "strategy_return",
            "benchmark_wealth",
            "strategy_wealth",
        ]);
        wtr.write_record(&header).map_err(write_err)?;

        for (i, bar) in report.bars.iter().enumerate() {
            let mut row = vec![
                bar.date.format("%Y-%m-%d").to_string(),
                format!("{:.4}", bar.open),
                format!("{:.4}", bar.high),
                format!("{:.4}", bar.low),
                format!("{:.4}", bar.close),
                bar.volume.to_string(),
            ];

            match params {
                StrategyParams::DualMa {
                    short_window,
                    long_window,
                } => {
                    let short = report.indicators.get(&IndicatorType::Sma(*short_window));
                    let long = report.indicators.get(&IndicatorType::Sma(*long_window));
                    row.push(simple_cell(short, i));
                    row.push(simple_cell(long, i));
                }
                StrategyParams::MacdRsi {
                    macd_fast,
                    macd_slow,
                    rsi_period,
                    ..
                } => {
                    let macd = report.indicators.get(&IndicatorType::Macd {
                        fast: *macd_fast,
                        slow: *macd_slow,
                        signal: DEFAULT_SIGNAL,
                    });
                    let rsi = report.indicators.get(&IndicatorType::Rsi(*rsi_period));
                    row.extend(macd_cells(macd, i));
                    row.push(simple_cell(rsi, i));
                }
            }

            row.push(report.signal.get(i).copied().unwrap_or(0).to_string());
            row.push(report.positions.get(i).copied().unwrap_or(0).to_string());
            row.push(format!("{:.6}", report.backtest.benchmark_returns[i]));
            row.push(format!("{:.6}", report.backtest.strategy_returns[i]));
            row.push(format!("{:.6}", report.backtest.benchmark_wealth[i]));
            row.push(format!("{:.6}", report.backtest.strategy_wealth[i]));

            wtr.write_record(&row).map_err(write_err)?;
        }

        wtr.flush().map_err(|e| QuantlabError::Provider {
            reason: format!("failed to write report {}: {}", output_path, e),
        })?;
        Ok(())
    }
}
