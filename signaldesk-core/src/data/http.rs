//! Blocking HTTP transport and the prediction-backend client.
//!
//! The prediction backend exposes `GET /predict/{symbol}` and
//! `GET /history/{symbol}`. Requests are never retried: a failed lookup fails
//! that one user action and the user asks again.

use std::time::Duration;

use tracing::debug;

use super::provider::{DataError, HistoryProvider, SignalProvider};
use super::wire::{parse_history, HistoryRecord, PredictionResponse};
use crate::domain::SignalQuote;

/// Shared blocking client with the status handling every service needs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::UpstreamUnavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` with optional query pairs and return the JSON body.
    ///
    /// A 404 maps to [`DataError::SymbolNotFound`] for `subject`.
    pub fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        subject: &str,
    ) -> Result<serde_json::Value, DataError> {
        debug!(url, subject, "GET");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| DataError::UpstreamUnavailable(format!("{url}: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: subject.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::UpstreamUnavailable(format!(
                "HTTP {status} for {subject}"
            )));
        }

        resp.json::<serde_json::Value>().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {subject}: {e}"))
        })
    }
}

/// Client for the prediction backend.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    transport: HttpTransport,
    base_url: String,
}

impl HttpPredictionClient {
    pub fn new(base_url: impl Into<String>, transport: HttpTransport) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn predict_url(&self, symbol: &str) -> String {
        format!("{}/predict/{}", self.base_url, symbol.trim().to_uppercase())
    }

    fn history_url(&self, symbol: &str) -> String {
        format!("{}/history/{}", self.base_url, symbol.trim().to_uppercase())
    }
}

impl SignalProvider for HttpPredictionClient {
    fn name(&self) -> &str {
        "prediction_backend"
    }

    fn fetch_signal(&self, symbol: &str) -> Result<SignalQuote, DataError> {
        let body = self.transport.get_json(&self.predict_url(symbol), &[], symbol)?;
        let resp: PredictionResponse = serde_json::from_value(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("prediction for {symbol}: {e}"))
        })?;
        resp.into_quote(symbol)
    }
}

impl HistoryProvider for HttpPredictionClient {
    /// Non-array bodies come back as an empty history, not an error.
    fn fetch_history(&self, symbol: &str) -> Result<Vec<HistoryRecord>, DataError> {
        let body = self.transport.get_json(&self.history_url(symbol), &[], symbol)?;
        Ok(parse_history(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpPredictionClient {
        HttpPredictionClient::new(base, HttpTransport::new(Duration::from_secs(1)).unwrap())
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let c = client("http://127.0.0.1:8001/");
        assert_eq!(c.predict_url(" aapl "), "http://127.0.0.1:8001/predict/AAPL");
        assert_eq!(c.history_url("tsla"), "http://127.0.0.1:8001/history/TSLA");
    }

    #[test]
    fn unreachable_backend_is_upstream_unavailable() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let c = client("http://127.0.0.1:9");
        let err = c.fetch_signal("AAPL").unwrap_err();
        assert!(matches!(err, DataError::UpstreamUnavailable(_)));
    }
}
