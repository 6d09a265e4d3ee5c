//! Strategy parameter sets.
//!
//! The two strategy modes are a closed tagged union. Signal generation
//! matches on the variant once per run; there is no runtime dispatch.

use crate::domain::indicator::macd::DEFAULT_SIGNAL;
use crate::domain::indicator::IndicatorType;

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyParams {
    /// Golden/death crosses of a short SMA over a long SMA.
    DualMa {
        short_window: usize,
        long_window: usize,
    },
    /// MACD line crosses filtered by an RSI overbought threshold. The MACD
    /// signal-line span is fixed at [`DEFAULT_SIGNAL`].
    MacdRsi {
        macd_fast: usize,
        macd_slow: usize,
        rsi_period: usize,
        rsi_overbought: f64,
        rsi_oversold: f64,
    },
}

impl StrategyParams {
    pub fn dual_ma_default() -> StrategyParams {
        StrategyParams::DualMa {
            short_window: 5,
            long_window: 20,
        }
    }

    pub fn macd_rsi_default() -> StrategyParams {
        StrategyParams::MacdRsi {
            macd_fast: 12,
            macd_slow: 26,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyParams::DualMa { .. } => "dual MA crossover",
            StrategyParams::MacdRsi { .. } => "MACD + RSI",
        }
    }

    /// The indicator series this variant consumes.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        match self {
            StrategyParams::DualMa {
                short_window,
                long_window,
            } => vec![
                IndicatorType::Sma(*short_window),
                IndicatorType::Sma(*long_window),
            ],
            StrategyParams::MacdRsi {
                macd_fast,
                macd_slow,
                rsi_period,
                ..
            } => vec![
                IndicatorType::Macd {
                    fast: *macd_fast,
                    slow: *macd_slow,
                    signal: DEFAULT_SIGNAL,
                },
                IndicatorType::Rsi(*rsi_period),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_ma_defaults() {
        let params = StrategyParams::dual_ma_default();
        assert_eq!(
            params,
            StrategyParams::DualMa {
                short_window: 5,
                long_window: 20
            }
        );
        assert_eq!(params.name(), "dual MA crossover");
    }

    #[test]
    fn macd_rsi_defaults() {
        let params = StrategyParams::macd_rsi_default();
        assert_eq!(
            params,
            StrategyParams::MacdRsi {
                macd_fast: 12,
                macd_slow: 26,
                rsi_period: 14,
                rsi_overbought: 70.0,
                rsi_oversold: 30.0,
            }
        );
        assert_eq!(params.name(), "MACD + RSI");
    }

    #[test]
    fn dual_ma_indicator_types() {
        let params = StrategyParams::DualMa {
            short_window: 3,
            long_window: 10,
        };
        assert_eq!(
            params.indicator_types(),
            vec![IndicatorType::Sma(3), IndicatorType::Sma(10)]
        );
    }

    #[test]
    fn macd_rsi_indicator_types() {
        let params = StrategyParams::macd_rsi_default();
        assert_eq!(
            params.indicator_types(),
            vec![
                IndicatorType::Macd {
                    fast: 12,
                    slow: 26,
                    signal: 9
                },
                IndicatorType::Rsi(14)
            ]
        );
    }
}
