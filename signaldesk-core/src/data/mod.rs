//! External data: provider traits, wire formats, HTTP clients and the mock source.

pub mod directory;
pub mod http;
pub mod mock;
pub mod provider;
pub mod rates;
pub mod wire;
pub mod yahoo;

pub use directory::{Listing, SymbolDirectory};
pub use http::{HttpPredictionClient, HttpTransport};
pub use mock::MockProvider;
pub use provider::{DataError, HistoryProvider, RateProvider, SignalProvider, SymbolSearch};
pub use rates::{HttpRateClient, DEFAULT_RATES_URL};
pub use wire::{HistoryRecord, PredictionResponse, SearchQuote};
pub use yahoo::{YahooSearchClient, DEFAULT_SEARCH_URL};
