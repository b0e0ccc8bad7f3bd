//! Wire formats of the external services.
//!
//! None of these services are under our control, so every field that can be
//! missing is optional and array elements that fail to parse are skipped
//! rather than failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::provider::DataError;
use crate::domain::{SignalDetails, SignalQuote};

/// Deserialize a possibly-missing array, dropping elements that don't parse.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// `GET /predict/{symbol}` response.
///
/// Newer backends send the direction as `signal`, older ones as `prediction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default, alias = "signal")]
    pub prediction: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub details: Option<SignalDetails>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictionResponse {
    /// Check the response for an upstream error and required fields.
    ///
    /// `requested` is used when the backend omits the symbol.
    pub fn into_quote(self, requested: &str) -> Result<SignalQuote, DataError> {
        if let Some(message) = self.error {
            return Err(DataError::Upstream {
                symbol: requested.to_string(),
                message,
            });
        }
        let current_price = self.current_price.ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("prediction for {requested} has no current_price"))
        })?;
        let prediction = self.prediction.ok_or_else(|| {
            DataError::ResponseFormatChanged(format!("prediction for {requested} has no signal"))
        })?;
        Ok(SignalQuote {
            symbol: self
                .symbol
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| requested.to_string()),
            current_price,
            prediction,
            confidence: self.confidence,
            details: self.details,
        })
    }
}

/// One element of the `GET /history/{symbol}` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "date", alias = "time")]
    pub label: String,
    pub price: f64,
}

/// Parse a history body. Anything other than an array (for example the
/// backend's `{"error": ...}` object) is treated as no history.
pub fn parse_history(body: serde_json::Value) -> Vec<HistoryRecord> {
    match body {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Symbol-search response: `{ "quotes": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub quotes: Vec<SearchQuote>,
}

/// A raw search hit as the search service reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuote {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub shortname: Option<String>,
    #[serde(default)]
    pub longname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "exchDisp")]
    pub exch_disp: Option<String>,
    #[serde(default, rename = "isYahooFinance")]
    pub is_yahoo_finance: Option<bool>,
}

/// Exchange-rate response: `{ "base": "USD", "rates": { "EUR": 0.92, ... } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub rates: BTreeMap<String, serde_json::Value>,
}

impl RatesResponse {
    /// Numeric rates only; non-numeric entries are dropped.
    pub fn numeric_rates(&self) -> BTreeMap<String, f64> {
        self.rates
            .iter()
            .filter_map(|(code, v)| v.as_f64().map(|r| (code.clone(), r)))
            .collect()
    }
}
