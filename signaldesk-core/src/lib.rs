//! SignalDesk Core: trade-plan engine, synthetic series, symbol matching,
//! currency display and prediction history.
//!
//! This crate contains the decision logic behind the signal screen:
//! - Domain types (signals, plans, price points, search candidates)
//! - Trade-plan derivation from a BUY/SELL signal and the current price
//! - Synthetic, anchor-pinned price series for charting
//! - Autocomplete filtering, suggestion state and the stale-response guard
//! - USD → display-currency formatting
//! - Bounded newest-first prediction history
//! - Provider traits with HTTP and seeded mock implementations

pub mod currency;
pub mod data;
pub mod domain;
pub mod history;
pub mod plan;
pub mod rng;
pub mod series;
pub mod symbols;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use currency::{format_amount, CurrencyTable};
pub use domain::{Direction, PricePoint, PriceSignal, SearchCandidate, TradePlan};
pub use history::{HistoryLog, HISTORY_CAPACITY};
pub use plan::{compute_levels, compute_plan, PlanError, PlanParams, TradeLevels};
pub use rng::{RandomSource, RngHierarchy};
pub use series::{generate_series, ChartSeries, SeriesError};
pub use symbols::{RequestSequencer, SuggestionBox, SuggestionEvent, SymbolMatcher};
