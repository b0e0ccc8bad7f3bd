//! Provider traits and structured error types.
//!
//! The traits abstract over where signals, price history, search hits and
//! exchange rates come from (the HTTP services or the seeded mock), so the
//! orchestration layer can swap implementations and tests can stub them.

use std::collections::BTreeMap;
use thiserror::Error;

use super::wire::{HistoryRecord, SearchQuote};
use crate::domain::SignalQuote;

/// Structured error types for provider lookups.
///
/// These are designed to be displayable in both CLI and interactive contexts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{symbol}: {message}")]
    Upstream { symbol: String, message: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },
}

/// Prediction lookups: current price plus a raw BUY/SELL signal.
pub trait SignalProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch_signal(&self, symbol: &str) -> Result<SignalQuote, DataError>;
}

/// Recent price history for charting.
///
/// An empty result is not an error: the caller generates a synthetic series.
pub trait HistoryProvider: Send + Sync {
    fn fetch_history(&self, symbol: &str) -> Result<Vec<HistoryRecord>, DataError>;
}

/// Free-text symbol search for autocomplete.
pub trait SymbolSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<SearchQuote>, DataError>;
}

/// USD-based exchange rates, fetched once at startup.
pub trait RateProvider: Send + Sync {
    fn fetch_rates(&self) -> Result<BTreeMap<String, f64>, DataError>;
}
