//! CLI definition and dispatch.
//!
//! Progress and warnings go to stderr, results to stdout. Each subcommand
//! maps its errors to an exit code through the error taxonomy.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{analyze, AnalysisReport};
use crate::domain::config_validation::{validate_analysis_config, validate_strategy_config};
use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantlab", about = "Technical-indicator strategy analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a symbol and backtest its strategy
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        market: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show local store coverage for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        market: Option<String>,
    },
    /// List locally stored symbols
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        market: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            market,
            strategy,
            output,
        } => run_analyze(
            &config,
            symbol.as_deref(),
            market.as_deref(),
            strategy.as_deref(),
            output.as_ref(),
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            config,
            symbol,
            market,
        } => run_info(&config, symbol.as_deref(), market.as_deref()),
        Command::ListSymbols { config, market } => run_list_symbols(&config, market.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantlabError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Market from the CLI override or the `[analysis] market` key.
pub fn resolve_market(
    market_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Market, QuantlabError> {
    let spelling = match market_override {
        Some(m) => m.to_string(),
        None => config.get_string("analysis", "market").ok_or_else(|| {
            QuantlabError::ConfigMissing {
                section: "analysis".into(),
                key: "market".into(),
            }
        })?,
    };
    Market::parse(&spelling).ok_or_else(|| QuantlabError::ConfigInvalid {
        section: "analysis".into(),
        key: "market".into(),
        reason: format!("unknown market {:?}, expected a-share or us", spelling),
    })
}

/// Symbol from the CLI override or the `[analysis] symbol` key, normalized
/// to the store's spelling: uppercased, with the exchange prefix a broker
/// interface sometimes attaches to A-share codes (`sh600519`) stripped.
pub fn resolve_symbol(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
    market: Market,
) -> Result<String, QuantlabError> {
    let raw = match symbol_override {
        Some(s) => s.to_string(),
        None => config
            .get_string("analysis", "symbol")
            .unwrap_or_default(),
    };
    let mut symbol = raw.trim().to_uppercase();
    if market == Market::AShare {
        let stripped = symbol
            .strip_prefix("SH")
            .or_else(|| symbol.strip_prefix("SZ"))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);
        if let Some(stripped) = stripped {
            symbol = stripped;
        }
    }
    if symbol.is_empty() {
        return Err(QuantlabError::ConfigMissing {
            section: "analysis".into(),
            key: "symbol".into(),
        });
    }
    Ok(symbol)
}

pub fn build_date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), QuantlabError> {
    let parse = |key: &str| -> Result<NaiveDate, QuantlabError> {
        let value = config.get_string("analysis", key).ok_or_else(|| {
            QuantlabError::ConfigMissing {
                section: "analysis".into(),
                key: key.into(),
            }
        })?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| QuantlabError::ConfigInvalid {
            section: "analysis".into(),
            key: key.into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        })
    };

    let start_date = parse("start_date")?;
    let end_date = parse("end_date")?;
    if start_date >= end_date {
        return Err(QuantlabError::ConfigInvalid {
            section: "analysis".into(),
            key: "start_date".into(),
            reason: "start_date must be before end_date".into(),
        });
    }
    Ok((start_date, end_date))
}

/// Strategy parameters from `[strategy]`, with an optional type override
/// from the CLI. Unset numeric keys fall back to the variant defaults.
pub fn build_strategy_params(
    config: &dyn ConfigPort,
    type_override: Option<&str>,
) -> Result<StrategyParams, QuantlabError> {
    let strategy_type = match type_override {
        Some(t) => t.to_string(),
        None => config.get_string("strategy", "type").ok_or_else(|| {
            QuantlabError::ConfigMissing {
                section: "strategy".into(),
                key: "type".into(),
            }
        })?,
    };

    let window = |key: &str, default: i64| config.get_int("strategy", key, default).max(0) as usize;

    match strategy_type.trim().to_lowercase().as_str() {
        "dual-ma" => Ok(StrategyParams::DualMa {
            short_window: window("ma_short", 5),
            long_window: window("ma_long", 20),
        }),
        "macd-rsi" => Ok(StrategyParams::MacdRsi {
            macd_fast: window("macd_fast", 12),
            macd_slow: window("macd_slow", 26),
            rsi_period: window("rsi_period", 14),
            rsi_overbought: config.get_double("strategy", "rsi_overbought", 70.0),
            rsi_oversold: config.get_double("strategy", "rsi_oversold", 30.0),
        }),
        other => Err(QuantlabError::ConfigInvalid {
            section: "strategy".into(),
            key: "type".into(),
            reason: format!("unknown strategy {:?}, expected dual-ma or macd-rsi", other),
        }),
    }
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvDataAdapter, QuantlabError> {
    let cache_dir = config
        .get_string("data", "cache_dir")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| QuantlabError::ConfigMissing {
            section: "data".into(),
            key: "cache_dir".into(),
        })?;
    Ok(CsvDataAdapter::new(PathBuf::from(cache_dir)))
}

fn run_analyze(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    market_override: Option<&str>,
    strategy_override: Option<&str>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Stage 2: Resolve the request (flags override config)
    let market = match resolve_market(market_override, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let symbol = match resolve_symbol(symbol_override, &config, market) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (start_date, end_date) = match build_date_range(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Validate and build the strategy
    if strategy_override.is_none() {
        if let Err(e) = validate_strategy_config(&config) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }
    let params = match build_strategy_params(&config, strategy_override) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Strategy: {}", params.name());

    // Stage 4: Fetch bars through the data port
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Fetching {} ({}) from {} to {}",
        symbol, market, start_date, end_date
    );
    let bars = match data_port.fetch_daily(market, &symbol, start_date, end_date) {
        Ok(bars) => bars,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if bars.is_empty() {
        let err = QuantlabError::NoData {
            market,
            symbol: symbol.clone(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    // Stage 5: Run the pipeline
    eprintln!("Analyzing {} bars", bars.len());
    let report = analyze(bars, &params);

    // Stage 6: Print results
    print_report(&symbol, market, &report);

    // Stage 7: Optional CSV report
    if let Some(path) = output_path {
        let writer = CsvReportAdapter::new();
        match writer.write(&report, &params, &path.display().to_string()) {
            Ok(()) => eprintln!("Report written to {}", path.display()),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_report(symbol: &str, market: Market, report: &AnalysisReport) {
    let first = report.bars.first().map(|b| b.date);
    let last = report.bars.last().map(|b| b.date);
    if let (Some(first), Some(last)) = (first, last) {
        println!("=== {} ({}) {} to {} ===", symbol, market, first, last);
    }

    if let Some(summary) = &report.summary {
        println!("Open:         {:.2}", summary.open_price);
        println!("Latest close: {:.2}", summary.latest_close);
        println!(
            "Change:       {:+.2} ({:+.2}%)",
            summary.change, summary.change_pct
        );
        println!("Period high:  {:.2}", summary.period_high);
    }

    println!("\n=== Signals ===");
    if report.events.is_empty() {
        println!("no signals in range");
    } else {
        for event in &report.events {
            println!("{}  {:<4}  {}", event.date, event.direction, event.label);
        }
    }

    let bt = &report.backtest;
    println!("\n=== Backtest ===");
    println!("Strategy return:   {:+.2}%", bt.strategy_total_return);
    println!("Benchmark return:  {:+.2}%", bt.benchmark_total_return);
    println!(
        "Holding days:      {} of {}",
        bt.holding_days,
        report.bars.len()
    );
    println!("Win rate:          {:.1}%", bt.win_rate);
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_analysis_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match build_strategy_params(&config, None) {
        Ok(params) => eprintln!("Strategy: {}", params.name()),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>, market: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let market = match resolve_market(market, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let symbol = match resolve_symbol(symbol, &config, market) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.data_range(market, &symbol) {
        Ok(Some((first, last, count))) => {
            println!("{} ({}): {} bars, {} to {}", symbol, market, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{} ({}): no local data", symbol, market);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &PathBuf, market: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let market = match resolve_market(market, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match data_port.list_symbols(market) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols stored for {}", market);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
