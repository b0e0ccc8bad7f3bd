use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Direction, PricePoint, SignalDetails};

/// Where the plan's confidence figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceSource {
    /// The predictor reported a probability.
    Model,
    /// No model confidence; synthesized from the configured floor and spread.
    Synthesized,
}

/// Where the plan's chart series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrigin {
    Upstream,
    Synthetic,
}

/// A fully derived trade plan. Never mutated after creation.
///
/// Invariant: BUY ⇒ `target_price > current_price > stop_loss`,
/// SELL ⇒ `target_price < current_price < stop_loss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub symbol: String,
    pub company_name: Option<String>,
    pub direction: Direction,
    pub current_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub profit_pct: f64,
    pub risk_pct: f64,
    pub risk_reward_ratio: f64,
    pub confidence_pct: f64,
    pub confidence_source: ConfidenceSource,
    pub series: Vec<PricePoint>,
    pub series_origin: SeriesOrigin,
    pub generated_at: DateTime<Utc>,
    pub holding_period: String,
    pub details: Option<SignalDetails>,
}

impl TradePlan {
    /// `LONG` for BUY plans, `SHORT` for SELL plans.
    pub fn position_label(&self) -> &'static str {
        match self.direction {
            Direction::Buy => "LONG",
            Direction::Sell => "SHORT",
        }
    }

    /// Reward-to-risk in the `1:x` form shown next to the levels.
    pub fn reward_risk_label(&self) -> String {
        format!("1:{:.2}", self.risk_reward_ratio)
    }

    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.company_name = Some(name);
        }
        self
    }

    /// One-paragraph recommendation. `money` renders price levels in the
    /// caller's display currency.
    pub fn summary(&self, money: impl Fn(f64) -> String) -> String {
        format!(
            "Recommended {} position for {} with entry at {}. Target profit level set at {} \
             ({:.2}% gain) with protective stop-loss at {} ({:.2}% risk). \
             Estimated holding period: {}.",
            self.position_label(),
            self.symbol,
            money(self.current_price),
            money(self.target_price),
            self.profit_pct,
            money(self.stop_loss),
            self.risk_pct,
            self.holding_period,
        )
    }
}
