//! Exchange-rate lookup.

use std::collections::BTreeMap;

use super::http::HttpTransport;
use super::provider::{DataError, RateProvider};
use super::wire::RatesResponse;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Client for a `{ base, rates }` exchange-rate endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateClient {
    transport: HttpTransport,
    url: String,
}

impl HttpRateClient {
    pub fn new(url: impl Into<String>, transport: HttpTransport) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

impl RateProvider for HttpRateClient {
    fn fetch_rates(&self) -> Result<BTreeMap<String, f64>, DataError> {
        let body = self.transport.get_json(&self.url, &[], "exchange rates")?;
        let resp: RatesResponse = serde_json::from_value(body)
            .map_err(|e| DataError::ResponseFormatChanged(format!("exchange rates: {e}")))?;

        if let Some(base) = resp.base.as_deref() {
            if !base.eq_ignore_ascii_case("USD") {
                return Err(DataError::ResponseFormatChanged(format!(
                    "exchange rates are based on {base}, expected USD"
                )));
            }
        }
        Ok(resp.numeric_rates())
    }
}
