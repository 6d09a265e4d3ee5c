//! Error taxonomy for the shell around the analysis core.
//!
//! The numeric pipeline itself never errors: empty input produces empty
//! output and degenerate ratios are defined explicitly. Errors arise only
//! at the boundaries (configuration, data store, report writing).

use crate::domain::market::Market;

/// Top-level error type for quantlab.
#[derive(Debug, thiserror::Error)]
pub enum QuantlabError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data provider error: {reason}")]
    Provider { reason: String },

    #[error("no data for {symbol} on {market}")]
    NoData { market: Market, symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantlabError> for std::process::ExitCode {
    fn from(err: &QuantlabError) -> Self {
        let code: u8 = match err {
            QuantlabError::Io(_) => 1,
            QuantlabError::ConfigParse { .. }
            | QuantlabError::ConfigMissing { .. }
            | QuantlabError::ConfigInvalid { .. } => 2,
            QuantlabError::Provider { .. } => 3,
            QuantlabError::NoData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
