//! Plan-request orchestration.
//!
//! A [`Session`] owns everything one user sees: the providers, the rate table
//! fetched at startup, the current plan and the recent-predictions log.
//!
//! A request runs the signal lookup and the history lookup side by side,
//! joins them, and only then derives the plan. Either lookup failing fails
//! the whole request; no partial plan is ever stored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use signaldesk_core::data::DataError;
use signaldesk_core::domain::SeriesOrigin;
use signaldesk_core::series::series_from_records;
use signaldesk_core::{
    compute_plan, format_amount, generate_series, ChartSeries, CurrencyTable, HistoryLog,
    PlanError, PriceSignal, RngHierarchy, SeriesError, TradePlan,
};

use crate::config::AppConfig;
use crate::source::Providers;

/// Errors from a single plan request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no symbol given")]
    EmptySymbol,

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

impl RequestError {
    /// One line suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptySymbol => "Enter a stock symbol first.".into(),
            Self::Data(DataError::Upstream { message, .. }) => format!("Error: {message}"),
            Self::Data(DataError::UpstreamUnavailable(_)) => {
                "Prediction service not responding. Make sure it is running.".into()
            }
            Self::Data(DataError::SymbolNotFound { symbol }) => {
                format!("No prediction available for {symbol}.")
            }
            Self::Data(DataError::ResponseFormatChanged(_)) => {
                "The prediction service sent a response we could not read.".into()
            }
            Self::Plan(PlanError::UnknownSignal(s)) => {
                format!("The predictor returned '{s}', which is not a BUY or SELL signal.")
            }
            Self::Plan(PlanError::InvalidPrice(p)) => {
                format!("The predictor returned an unusable price ({p}).")
            }
            Self::Plan(e) => format!("Could not build a trade plan: {e}"),
            Self::Series(e) => format!("Could not build the price chart: {e}"),
        }
    }
}

/// Sets the loading flag for its lifetime.
///
/// Dropping the guard clears the flag, so every way out of a request
/// (success, upstream error, calculation error, panic unwind) leaves the
/// session idle.
#[derive(Debug)]
pub struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    pub fn engage(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Fetch the rate table once. Any failure degrades to identity rates.
pub fn load_rates(providers: &Providers) -> CurrencyTable {
    match providers.rates.fetch_rates() {
        Ok(rates) => {
            let table = CurrencyTable::from_rates(rates);
            info!(currencies = table.rates.len(), "exchange rates loaded");
            table
        }
        Err(e) => {
            warn!(error = %e, "exchange rates unavailable, showing USD values");
            CurrencyTable::identity()
        }
    }
}

/// One user's view: current plan, recent plans and display settings.
#[derive(Debug)]
pub struct Session {
    providers: Providers,
    config: AppConfig,
    rng: RngHierarchy,
    requests: u64,
    loading: Arc<AtomicBool>,
    rates: CurrencyTable,
    currency: String,
    current: Option<TradePlan>,
    last_error: Option<String>,
    history: HistoryLog,
}

impl Session {
    /// Start a session. Fetches the rate table once.
    pub fn start(providers: Providers, config: AppConfig) -> Self {
        let rates = load_rates(&providers);
        Self::with_rates(providers, config, rates)
    }

    /// Start a session with an already-loaded rate table.
    pub fn with_rates(providers: Providers, config: AppConfig, rates: CurrencyTable) -> Self {
        let currency = config.display.currency.trim().to_uppercase();
        Self {
            rng: RngHierarchy::new(config.source.seed),
            providers,
            config,
            requests: 0,
            loading: Arc::new(AtomicBool::new(false)),
            rates,
            currency,
            current: None,
            last_error: None,
            history: HistoryLog::new(),
        }
    }

    /// Replace the recent-predictions log, e.g. with one loaded from disk.
    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = history;
        self
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared handle to the loading flag, for a UI thread to poll.
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.loading)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<&TradePlan> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn rates(&self) -> &CurrencyTable {
        &self.rates
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Switch the display currency. Stored plans are untouched.
    pub fn set_currency(&mut self, code: &str) {
        self.currency = code.trim().to_uppercase();
    }

    /// Render a USD amount in the display currency.
    pub fn money(&self, amount_usd: f64) -> String {
        format_amount(Some(amount_usd), &self.currency, &self.rates)
    }

    /// Request a plan for `symbol` now.
    pub fn request_plan(
        &mut self,
        symbol: &str,
        company_name: Option<&str>,
    ) -> Result<TradePlan, RequestError> {
        self.request_plan_at(symbol, company_name, Utc::now())
    }

    /// Request a plan with an explicit timestamp.
    ///
    /// On success the plan becomes current and is prepended to the history.
    /// On failure the current plan is cleared and the user-facing message is
    /// kept in [`last_error`](Self::last_error).
    pub fn request_plan_at(
        &mut self,
        symbol: &str,
        company_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TradePlan, RequestError> {
        let _loading = LoadingGuard::engage(self.loading_flag());
        self.current = None;
        self.last_error = None;

        match self.build_plan(symbol, company_name, now) {
            Ok(plan) => {
                info!(
                    symbol = %plan.symbol,
                    direction = %plan.direction,
                    price = plan.current_price,
                    rr = plan.risk_reward_ratio,
                    series = ?plan.series_origin,
                    "plan ready"
                );
                self.history.push(plan.clone());
                self.current = Some(plan.clone());
                Ok(plan)
            }
            Err(e) => {
                warn!(symbol, error = %e, "plan request failed");
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn build_plan(
        &mut self,
        symbol: &str,
        company_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TradePlan, RequestError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(RequestError::EmptySymbol);
        }

        let signals = Arc::clone(&self.providers.signals);
        let history = Arc::clone(&self.providers.history);
        let (quote, records) = rayon::join(
            || signals.fetch_signal(&symbol),
            || history.fetch_history(&symbol),
        );
        let signal = PriceSignal::try_from(quote?)?;
        let records = records?;
        debug!(symbol = %signal.symbol, records = records.len(), "lookups joined");

        let mut rng = self.rng.rng_for(&signal.symbol, self.requests);
        self.requests += 1;

        let chart = match series_from_records(&records, signal.current_price) {
            Some(points) => ChartSeries {
                points,
                origin: SeriesOrigin::Upstream,
            },
            None => {
                warn!(symbol = %signal.symbol, "no usable history, generating synthetic series");
                let points = generate_series(
                    signal.current_price,
                    self.config.series.num_days,
                    now.date_naive(),
                    &mut rng,
                )?;
                ChartSeries {
                    points,
                    origin: SeriesOrigin::Synthetic,
                }
            }
        };

        let plan = compute_plan(&signal, &self.config.plan, chart, now, &mut rng)?;
        let name = company_name
            .map(str::to_string)
            .or_else(|| self.providers.company_name(&signal.symbol));
        Ok(match name {
            Some(name) => plan.with_company_name(name),
            None => plan,
        })
    }
}
