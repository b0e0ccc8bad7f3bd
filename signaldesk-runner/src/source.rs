//! Data-source selection.
//!
//! One request flow serves both demo and live use. The config picks a
//! [`DataSource`], which is then split into the trait objects the session and
//! the autocomplete worker hold.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use signaldesk_core::data::{
    DataError, HistoryProvider, HttpPredictionClient, HttpRateClient, HttpTransport, MockProvider,
    RateProvider, SignalProvider, SymbolDirectory, SymbolSearch, YahooSearchClient,
};

use crate::config::{AppConfig, SourceKind};

/// Errors from building a data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("failed to load symbol directory {path}: {message}")]
    Directory { path: PathBuf, message: String },
}

/// HTTP clients for the three live services.
#[derive(Debug, Clone)]
pub struct LiveSource {
    pub prediction: HttpPredictionClient,
    pub search: YahooSearchClient,
    pub rates: HttpRateClient,
    /// Optional local listing, used only to name symbols.
    pub directory: Option<SymbolDirectory>,
}

/// Where signals, history, search hits and rates come from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Mock(MockProvider),
    Live(LiveSource),
}

impl DataSource {
    /// Build the source the config asks for.
    ///
    /// A configured `[source] directory` replaces the mock listing and, in
    /// live mode, supplies company names.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let directory = config
            .source
            .directory
            .as_deref()
            .map(load_directory)
            .transpose()?;

        match config.source.kind {
            SourceKind::Mock => {
                let mock = MockProvider::new(config.source.seed);
                Ok(Self::Mock(match directory {
                    Some(directory) => mock.with_directory(directory),
                    None => mock,
                }))
            }
            SourceKind::Live => {
                let endpoints = &config.endpoints;
                let transport = HttpTransport::new(endpoints.timeout())?;
                Ok(Self::Live(LiveSource {
                    prediction: HttpPredictionClient::new(
                        endpoints.prediction_base_url.clone(),
                        transport.clone(),
                    ),
                    search: YahooSearchClient::new(endpoints.search_url.clone(), transport.clone()),
                    rates: HttpRateClient::new(endpoints.rates_url.clone(), transport),
                    directory,
                }))
            }
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Mock(_) => SourceKind::Mock,
            Self::Live(_) => SourceKind::Live,
        }
    }

    /// Split into shareable trait objects.
    pub fn into_providers(self) -> Providers {
        info!(source = ?self.kind(), "data source selected");
        match self {
            Self::Mock(mock) => {
                let directory = Some(mock.directory().clone());
                let mock = Arc::new(mock);
                Providers {
                    signals: mock.clone(),
                    history: mock.clone(),
                    search: mock.clone(),
                    rates: mock,
                    directory,
                }
            }
            Self::Live(live) => {
                let prediction = Arc::new(live.prediction);
                Providers {
                    signals: prediction.clone(),
                    history: prediction,
                    search: Arc::new(live.search),
                    rates: Arc::new(live.rates),
                    directory: live.directory,
                }
            }
        }
    }
}

fn load_directory(path: &Path) -> Result<SymbolDirectory, SourceError> {
    let directory = SymbolDirectory::from_file(path).map_err(|message| SourceError::Directory {
        path: path.to_path_buf(),
        message,
    })?;
    info!(path = %path.display(), listings = directory.len(), "symbol directory loaded");
    Ok(directory)
}

/// The four provider roles as shared trait objects.
///
/// Cloning is cheap; the autocomplete worker takes its own handle to
/// `search` while the session keeps the rest.
#[derive(Clone)]
pub struct Providers {
    pub signals: Arc<dyn SignalProvider>,
    pub history: Arc<dyn HistoryProvider>,
    pub search: Arc<dyn SymbolSearch>,
    pub rates: Arc<dyn RateProvider>,
    /// Local listings used to name a symbol when the caller has no selection.
    pub directory: Option<SymbolDirectory>,
}

impl Providers {
    /// Company name for `symbol` from the local directory, if any.
    pub fn company_name(&self, symbol: &str) -> Option<String> {
        self.directory
            .as_ref()
            .and_then(|d| d.get(symbol))
            .map(|listing| listing.name.clone())
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("signals", &self.signals.name())
            .field("directory", &self.directory.as_ref().map(|d| d.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_mock() {
        let source = DataSource::from_config(&AppConfig::default()).unwrap();
        assert_eq!(source.kind(), SourceKind::Mock);
    }

    #[test]
    fn live_config_selects_http_clients() {
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::Live;
        let source = DataSource::from_config(&config).unwrap();
        assert_eq!(source.kind(), SourceKind::Live);

        let providers = source.into_providers();
        assert_eq!(providers.signals.name(), "prediction_backend");
        assert!(providers.directory.is_none());
    }

    #[test]
    fn mock_providers_share_one_seed() {
        let providers = DataSource::from_config(&AppConfig::default())
            .unwrap()
            .into_providers();
        assert_eq!(providers.signals.name(), "mock");
        let a = providers.signals.fetch_signal("AAPL").unwrap();
        let b = MockProvider::new(42).fetch_signal("AAPL").unwrap();
        assert_eq!(a, b);
        assert!(providers.company_name("AAPL").is_some());
    }

    const LISTING: &str = r#"
        [[listings]]
        symbol = "ZOMATO.NS"
        name = "Zomato Limited"
        exchange = "NSE"
    "#;

    #[test]
    fn configured_directory_replaces_mock_listing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.toml");
        std::fs::write(&path, LISTING).unwrap();

        let mut config = AppConfig::default();
        config.source.directory = Some(path);
        let providers = DataSource::from_config(&config).unwrap().into_providers();

        assert_eq!(providers.company_name("zomato.ns").as_deref(), Some("Zomato Limited"));
        assert!(providers.company_name("AAPL").is_none());
        let hits = providers.search.search("zom").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol.as_deref(), Some("ZOMATO.NS"));
    }

    #[test]
    fn configured_directory_names_live_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.toml");
        std::fs::write(&path, LISTING).unwrap();

        let mut config = AppConfig::default();
        config.source.kind = SourceKind::Live;
        config.source.directory = Some(path);
        let providers = DataSource::from_config(&config).unwrap().into_providers();

        assert_eq!(providers.company_name("ZOMATO.NS").as_deref(), Some("Zomato Limited"));
    }

    #[test]
    fn missing_directory_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.source.directory = Some(dir.path().join("absent.toml"));

        let err = DataSource::from_config(&config).unwrap_err();
        assert!(matches!(err, SourceError::Directory { .. }));
    }
}
