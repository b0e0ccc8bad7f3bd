//! Yahoo Finance symbol search.
//!
//! Queries the v1 search endpoint, which returns `{ "quotes": [...] }`.
//! Yahoo has no official API and is subject to unannounced format changes,
//! so the response is parsed leniently (see [`super::wire`]).

use super::http::HttpTransport;
use super::provider::{DataError, SymbolSearch};
use super::wire::{SearchQuote, SearchResponse};

pub const DEFAULT_SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";

const QUOTES_COUNT: &str = "10";

/// Yahoo Finance search client.
#[derive(Debug, Clone)]
pub struct YahooSearchClient {
    transport: HttpTransport,
    url: String,
}

impl YahooSearchClient {
    pub fn new(url: impl Into<String>, transport: HttpTransport) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

impl SymbolSearch for YahooSearchClient {
    fn search(&self, query: &str) -> Result<Vec<SearchQuote>, DataError> {
        let body = self.transport.get_json(
            &self.url,
            &[("q", query.trim()), ("quotesCount", QUOTES_COUNT), ("newsCount", "0")],
            query,
        )?;
        let resp: SearchResponse = serde_json::from_value(body)
            .map_err(|e| DataError::ResponseFormatChanged(format!("search for '{query}': {e}")))?;
        Ok(resp.quotes)
    }
}
