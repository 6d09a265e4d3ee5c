//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values

pub mod sma;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::{calculate_ema, ema_values};
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd { dif: f64, dea: f64, histogram: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Simple value at `index`. NaN when the point is invalid, out of
    /// range, or not a `Simple` value, so comparisons against it are false.
    pub fn value_at(&self, index: usize) -> f64 {
        match self.values.get(index) {
            Some(p) if p.valid => match p.value {
                IndicatorValue::Simple(v) => v,
                _ => f64::NAN,
            },
            _ => f64::NAN,
        }
    }

    /// DIF component at `index` for a MACD series, NaN otherwise.
    pub fn dif_at(&self, index: usize) -> f64 {
        match self.values.get(index) {
            Some(p) if p.valid => match p.value {
                IndicatorValue::Macd { dif, .. } => dif,
                _ => f64::NAN,
            },
            _ => f64::NAN,
        }
    }

    /// DEA component at `index` for a MACD series, NaN otherwise.
    pub fn dea_at(&self, index: usize) -> f64 {
        match self.values.get(index) {
            Some(p) if p.valid => match p.value {
                IndicatorValue::Macd { dea, .. } => dea,
                _ => f64::NAN,
            },
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
