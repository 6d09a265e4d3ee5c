//! Configuration validation.
//!
//! Validates all config fields before an analysis runs. The numeric core
//! tolerates out-of-range parameters; validation is the caller's gate.

use crate::domain::error::QuantlabError;
use crate::domain::market::Market;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    validate_market(config)?;
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_cache_dir(config)?;
    validate_retries(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    match config.get_string("strategy", "type") {
        None => Err(QuantlabError::ConfigMissing {
            section: "strategy".to_string(),
            key: "type".to_string(),
        }),
        Some(t) => match t.trim() {
            "dual-ma" => validate_dual_ma(config),
            "macd-rsi" => validate_macd_rsi(config),
            other => Err(QuantlabError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "type".to_string(),
                reason: format!("unknown strategy {:?}, expected dual-ma or macd-rsi", other),
            }),
        },
    }
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    match config.get_string("analysis", "market") {
        None => Err(QuantlabError::ConfigMissing {
            section: "analysis".to_string(),
            key: "market".to_string(),
        }),
        Some(s) => match Market::parse(&s) {
            Some(_) => Ok(()),
            None => Err(QuantlabError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "market".to_string(),
                reason: format!("unknown market {:?}, expected a-share or us", s),
            }),
        },
    }
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    match config.get_string("analysis", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(QuantlabError::ConfigMissing {
            section: "analysis".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let start_str = config.get_string("analysis", "start_date");
    let end_str = config.get_string("analysis", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(QuantlabError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, QuantlabError> {
    match value {
        None => Err(QuantlabError::ConfigMissing {
            section: "analysis".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| QuantlabError::ConfigInvalid {
                section: "analysis".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_cache_dir(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    match config.get_string("data", "cache_dir") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(QuantlabError::ConfigMissing {
            section: "data".to_string(),
            key: "cache_dir".to_string(),
        }),
    }
}

fn validate_retries(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let retries = config.get_int("data", "retries", 3);
    if retries < 1 {
        return Err(QuantlabError::ConfigInvalid {
            section: "data".to_string(),
            key: "retries".to_string(),
            reason: "retries must be at least 1".to_string(),
        });
    }
    let delay = config.get_int("data", "retry_delay_ms", 2000);
    if delay < 0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "data".to_string(),
            key: "retry_delay_ms".to_string(),
            reason: "retry_delay_ms must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_dual_ma(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    validate_window(config, "ma_short", 5)?;
    validate_window(config, "ma_long", 20)?;
    Ok(())
}

fn validate_macd_rsi(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    validate_window(config, "macd_fast", 12)?;
    validate_window(config, "macd_slow", 26)?;
    validate_window(config, "rsi_period", 14)?;
    validate_rsi_thresholds(config)?;
    Ok(())
}

fn validate_window(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), QuantlabError> {
    let value = config.get_int("strategy", key, default);
    if value < 1 {
        return Err(QuantlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least 1", key),
        });
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), QuantlabError> {
    let overbought = config.get_double("strategy", "rsi_overbought", 70.0);
    let oversold = config.get_double("strategy", "rsi_oversold", 30.0);

    if oversold <= 0.0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be positive".to_string(),
        });
    }
    if overbought > 100.0 {
        return Err(QuantlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_overbought".to_string(),
            reason: "rsi_overbought must be at most 100".to_string(),
        });
    }
    if oversold >= overbought {
        return Err(QuantlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be below rsi_overbought".to_string(),
        });
    }
    Ok(())
}
