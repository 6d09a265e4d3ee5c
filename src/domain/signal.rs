//! Signal generation: crossover and threshold rules over indicator series.
//!
//! Events mark discrete rule transitions; the per-bar signal marks the
//! continuous holding state. The two are computed independently and may
//! disagree at series boundaries: a series can open with the short MA
//! already above the long one, giving a held state with no cross behind
//! it. Both outputs are preserved distinctly.
//!
//! Comparisons that involve an invalid indicator point resolve through
//! NaN and are false, so no rule fires during warmup.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use crate::domain::indicator::macd::DEFAULT_SIGNAL;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;
use crate::domain::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub direction: Direction,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalSet {
    /// Discrete rule transitions in date order.
    pub events: Vec<SignalEvent>,
    /// Holding state as of each bar's close: 1 = long, 0 = flat.
    pub signal: Vec<u8>,
    /// `signal` lagged by one bar for return attribution. The first bar
    /// is always flat.
    pub positions: Vec<u8>,
}

pub fn generate_signals(
    bars: &[PriceBar],
    params: &StrategyParams,
    indicators: &HashMap<IndicatorType, IndicatorSeries>,
) -> SignalSet {
    let (events, signal) = match params {
        StrategyParams::DualMa {
            short_window,
            long_window,
        } => dual_ma_signals(
            bars,
            indicators.get(&IndicatorType::Sma(*short_window)),
            indicators.get(&IndicatorType::Sma(*long_window)),
        ),
        StrategyParams::MacdRsi {
            macd_fast,
            macd_slow,
            rsi_period,
            rsi_overbought,
            ..
        } => macd_rsi_signals(
            bars,
            indicators.get(&IndicatorType::Macd {
                fast: *macd_fast,
                slow: *macd_slow,
                signal: DEFAULT_SIGNAL,
            }),
            indicators.get(&IndicatorType::Rsi(*rsi_period)),
            *rsi_overbought,
        ),
    };

    let positions = delay_one_bar(&signal);

    SignalSet {
        events,
        signal,
        positions,
    }
}

/// Shift the signal forward one bar: bar i's realized position is the
/// signal as of bar i-1, and positions[0] = 0.
pub fn delay_one_bar(signal: &[u8]) -> Vec<u8> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut positions = Vec::with_capacity(signal.len());
    positions.push(0);
    positions.extend_from_slice(&signal[..signal.len() - 1]);
    positions
}

fn dual_ma_signals(
    bars: &[PriceBar],
    short: Option<&IndicatorSeries>,
    long: Option<&IndicatorSeries>,
) -> (Vec<SignalEvent>, Vec<u8>) {
    let short_at = |i: usize| short.map_or(f64::NAN, |s| s.value_at(i));
    let long_at = |i: usize| long.map_or(f64::NAN, |s| s.value_at(i));

    let mut events = Vec::new();
    let mut signal = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let short_prev = short_at(i - 1);
            let long_prev = long_at(i - 1);
            let short_curr = short_at(i);
            let long_curr = long_at(i);

            if short_prev < long_prev && short_curr > long_curr {
                events.push(SignalEvent {
                    date: bar.date,
                    direction: Direction::Buy,
                    label: "golden cross",
                });
            }
            if short_prev > long_prev && short_curr < long_curr {
                events.push(SignalEvent {
                    date: bar.date,
                    direction: Direction::Sell,
                    label: "death cross",
                });
            }
        }

        // level-based, re-derived independently of the cross events
        signal.push((short_at(i) > long_at(i)) as u8);
    }

    (events, signal)
}

fn macd_rsi_signals(
    bars: &[PriceBar],
    macd: Option<&IndicatorSeries>,
    rsi: Option<&IndicatorSeries>,
    overbought: f64,
) -> (Vec<SignalEvent>, Vec<u8>) {
    let dif_at = |i: usize| macd.map_or(f64::NAN, |s| s.dif_at(i));
    let dea_at = |i: usize| macd.map_or(f64::NAN, |s| s.dea_at(i));
    let rsi_at = |i: usize| rsi.map_or(f64::NAN, |s| s.value_at(i));

    let mut events = Vec::new();
    let mut signal = Vec::with_capacity(bars.len());
    let mut held = false;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let cross_up = dif_at(i - 1) < dea_at(i - 1) && dif_at(i) > dea_at(i);
            let cross_down = dif_at(i - 1) > dea_at(i - 1) && dif_at(i) < dea_at(i);

            let buy = cross_up && rsi_at(i) < overbought;
            // overbought breakdown exits even without a MACD cross
            let sell = cross_down || (rsi_at(i - 1) >= overbought && rsi_at(i) < overbought);

            if buy {
                events.push(SignalEvent {
                    date: bar.date,
                    direction: Direction::Buy,
                    label: "trend start",
                });
            }
            if sell {
                events.push(SignalEvent {
                    date: bar.date,
                    direction: Direction::Sell,
                    label: "exit",
                });
            }

            // sell wins when both fire on the same bar
            if sell {
                held = false;
            } else if buy {
                held = true;
            }
        }

        signal.push(held as u8);
    }

    (events, signal)
}
