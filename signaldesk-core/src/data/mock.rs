//! Seeded mock data source for demo mode.
//!
//! Implements every provider trait without touching the network. Signals are
//! derived from the [`RngHierarchy`] stream of the requested symbol, so the
//! same seed and symbol always give the same price and direction. History is
//! always empty, which makes the caller fall back to a synthetic series just
//! like the live screen does when the history service has nothing.

use std::collections::BTreeMap;

use super::directory::SymbolDirectory;
use super::provider::{DataError, HistoryProvider, RateProvider, SignalProvider, SymbolSearch};
use super::wire::{HistoryRecord, SearchQuote};
use crate::domain::SignalQuote;
use crate::plan::round2;
use crate::rng::{RandomSource, RngHierarchy};

const MIN_MOCK_PRICE: f64 = 50.0;
const MOCK_PRICE_RANGE: f64 = 500.0;

/// Mock provider backed by a seed and a symbol directory.
#[derive(Debug, Clone)]
pub struct MockProvider {
    rng: RngHierarchy,
    directory: SymbolDirectory,
}

impl MockProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RngHierarchy::new(seed),
            directory: SymbolDirectory::default_listings(),
        }
    }

    pub fn with_directory(mut self, directory: SymbolDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn directory(&self) -> &SymbolDirectory {
        &self.directory
    }

    /// Fixed USD rates used in demo mode.
    pub fn demo_rates() -> BTreeMap<String, f64> {
        [
            ("USD", 1.0),
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("INR", 83.12),
            ("JPY", 149.5),
            ("CAD", 1.36),
            ("AUD", 1.52),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect()
    }
}

impl SignalProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_signal(&self, symbol: &str) -> Result<SignalQuote, DataError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DataError::SymbolNotFound { symbol });
        }

        let mut rng = self.rng.rng_for(&symbol, 0);
        let current_price = round2(MIN_MOCK_PRICE + rng.next_unit() * MOCK_PRICE_RANGE);
        let prediction = if rng.next_unit() < 0.5 { "BUY" } else { "SELL" };

        Ok(SignalQuote {
            symbol,
            current_price,
            prediction: prediction.to_string(),
            confidence: None,
            details: None,
        })
    }
}

impl HistoryProvider for MockProvider {
    fn fetch_history(&self, _symbol: &str) -> Result<Vec<HistoryRecord>, DataError> {
        Ok(Vec::new())
    }
}

impl SymbolSearch for MockProvider {
    fn search(&self, query: &str) -> Result<Vec<SearchQuote>, DataError> {
        Ok(self.directory.search(query))
    }
}

impl RateProvider for MockProvider {
    fn fetch_rates(&self) -> Result<BTreeMap<String, f64>, DataError> {
        Ok(Self::demo_rates())
    }
}
