//! Symbol directory: the listed instruments the mock data source knows about.
//!
//! Stored as a TOML list of `{ symbol, name, exchange }` entries so a demo
//! setup can ship its own list. The built-in default mixes NSE listings with
//! a handful of US names, which is enough to exercise the exchange filter.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::wire::SearchQuote;

/// One listed instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

/// The complete directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDirectory {
    pub listings: Vec<Listing>,
}

impl SymbolDirectory {
    /// Load a directory from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read directory file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a directory from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse directory TOML: {e}"))
    }

    /// Find a listing by exact symbol (case-insensitive).
    pub fn get(&self, symbol: &str) -> Option<&Listing> {
        let wanted = symbol.trim();
        self.listings
            .iter()
            .find(|l| l.symbol.eq_ignore_ascii_case(wanted))
    }

    /// Listings whose symbol starts with, or whose name contains, the query.
    ///
    /// Returned as raw search hits in directory order, the same shape the
    /// live search service produces.
    pub fn search(&self, query: &str) -> Vec<SearchQuote> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.listings
            .iter()
            .filter(|l| {
                l.symbol.to_lowercase().starts_with(&q) || l.name.to_lowercase().contains(&q)
            })
            .map(|l| SearchQuote {
                symbol: Some(l.symbol.clone()),
                shortname: Some(l.name.clone()),
                longname: None,
                name: None,
                exch_disp: Some(l.exchange.clone()),
                is_yahoo_finance: Some(true),
            })
            .collect()
    }

    /// Total number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Default directory: large NSE names plus a few US tickers.
    pub fn default_listings() -> Self {
        let rows: &[(&str, &str, &str)] = &[
            ("RELIANCE.NS", "Reliance Industries Limited", "NSE"),
            ("TCS.NS", "Tata Consultancy Services Limited", "NSE"),
            ("INFY.NS", "Infosys Limited", "NSE"),
            ("HDFCBANK.NS", "HDFC Bank Limited", "NSE"),
            ("ICICIBANK.NS", "ICICI Bank Limited", "NSE"),
            ("SBIN.NS", "State Bank of India", "NSE"),
            ("TATAMOTORS.NS", "Tata Motors Limited", "NSE"),
            ("WIPRO.NS", "Wipro Limited", "NSE"),
            ("ITC.NS", "ITC Limited", "NSE"),
            ("RELIANCE.BO", "Reliance Industries Limited", "BSE"),
            ("TCS.BO", "Tata Consultancy Services Limited", "BSE"),
            ("AAPL", "Apple Inc.", "NASDAQ"),
            ("MSFT", "Microsoft Corporation", "NASDAQ"),
            ("GOOGL", "Alphabet Inc.", "NASDAQ"),
            ("TSLA", "Tesla, Inc.", "NASDAQ"),
            ("IBM", "International Business Machines Corporation", "NYSE"),
        ];
        Self {
            listings: rows
                .iter()
                .map(|(symbol, name, exchange)| Listing {
                    symbol: (*symbol).into(),
                    name: (*name).into(),
                    exchange: (*exchange).into(),
                })
                .collect(),
        }
    }
}
