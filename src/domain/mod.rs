//! Core domain types and logic.

pub mod ohlcv;
pub mod market;
pub mod indicator;
pub mod strategy;
pub mod signal;
pub mod backtest;
pub mod analysis;
pub mod config_validation;
pub mod error;
