//! Listing venue for a requested symbol.

use std::fmt;

/// Supported markets. Determines how a symbol's series is keyed in the
/// local store (`A_600519_daily.csv` vs `US_TSLA_daily.csv`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Market {
    AShare,
    Us,
}

impl Market {
    /// Case-insensitive parse of the configuration spelling.
    pub fn parse(s: &str) -> Option<Market> {
        match s.trim().to_lowercase().as_str() {
            "a" | "a-share" | "ashare" | "cn" => Some(Market::AShare),
            "us" | "us-stock" => Some(Market::Us),
            _ => None,
        }
    }

    /// Prefix used in store file names.
    pub fn file_prefix(&self) -> &'static str {
        match self {
            Market::AShare => "A",
            Market::Us => "US",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::AShare => write!(f, "A-share"),
            Market::Us => write!(f, "US"),
        }
    }
}
