//! Trade-plan derivation.
//!
//! Turns a validated [`PriceSignal`] into entry/target/stop levels and the
//! profit, risk and reward/risk metrics shown next to them. Pure apart from
//! the injected [`RandomSource`], which is only consulted when the signal has
//! no model confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ConfidenceSource, Direction, PriceSignal, TradePlan};
use crate::rng::RandomSource;
use crate::series::ChartSeries;

/// Errors raised while deriving a plan. All of them are data-contract
/// violations: the plan is not built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid price {0}: current price must be a positive number")]
    InvalidPrice(f64),

    #[error("unknown signal '{0}': expected BUY or SELL")]
    UnknownSignal(String),

    #[error("risk percentage is zero: stop-loss sits on the entry price")]
    DivisionByZero,

    #[error("invalid plan parameter: {0}")]
    InvalidParameter(String),

    #[error("series does not end at the current price (expected {expected}, found {found:?})")]
    AnchorMismatch { expected: f64, found: Option<f64> },
}

/// Calculator parameters. Defaults reproduce the reference screen:
/// 10% target, 4% stop, synthesized confidence in `[85, 95]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParams {
    /// Fraction of the price added (BUY) or removed (SELL) for the target.
    pub target_pct: f64,
    /// Fraction of the price removed (BUY) or added (SELL) for the stop.
    pub stop_pct: f64,
    /// Lowest synthesized confidence, in percent.
    pub confidence_floor: f64,
    /// Width of the synthesized confidence band, in percent.
    pub confidence_spread: f64,
    pub holding_period: String,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            target_pct: 0.10,
            stop_pct: 0.04,
            confidence_floor: 85.0,
            confidence_spread: 10.0,
            holding_period: "1-2 Weeks".into(),
        }
    }
}

impl PlanParams {
    pub fn new(target_pct: f64, stop_pct: f64) -> Self {
        Self {
            target_pct,
            stop_pct,
            ..Self::default()
        }
    }

    /// Reject parameter sets that would break the level invariant.
    ///
    /// `stop_pct == 0` is accepted here and surfaces later as
    /// [`PlanError::DivisionByZero`].
    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.target_pct.is_finite() && self.target_pct > 0.0 && self.target_pct < 1.0) {
            return Err(PlanError::InvalidParameter(format!(
                "target_pct must be in (0, 1), got {}",
                self.target_pct
            )));
        }
        if !(self.stop_pct.is_finite() && self.stop_pct >= 0.0 && self.stop_pct < 1.0) {
            return Err(PlanError::InvalidParameter(format!(
                "stop_pct must be in [0, 1), got {}",
                self.stop_pct
            )));
        }
        if !(self.confidence_floor.is_finite() && self.confidence_spread.is_finite())
            || self.confidence_floor < 0.0
            || self.confidence_spread < 0.0
            || self.confidence_floor + self.confidence_spread > 100.0
        {
            return Err(PlanError::InvalidParameter(format!(
                "confidence band [{}, {}] must lie within [0, 100]",
                self.confidence_floor,
                self.confidence_floor + self.confidence_spread
            )));
        }
        Ok(())
    }
}

/// Numeric levels and metrics for one signal, before a series is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeLevels {
    pub target_price: f64,
    pub stop_loss: f64,
    pub profit_pct: f64,
    pub risk_pct: f64,
    pub risk_reward_ratio: f64,
    pub confidence_pct: f64,
    pub confidence_source: ConfidenceSource,
}

/// Round to 2 decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute target, stop and metrics for a signal.
pub fn compute_levels(
    signal: &PriceSignal,
    params: &PlanParams,
    rng: &mut dyn RandomSource,
) -> Result<TradeLevels, PlanError> {
    let price = signal.current_price;
    if !price.is_finite() || price <= 0.0 {
        return Err(PlanError::InvalidPrice(price));
    }
    params.validate()?;

    let (target_price, stop_loss) = match signal.direction {
        Direction::Buy => (
            price * (1.0 + params.target_pct),
            price * (1.0 - params.stop_pct),
        ),
        Direction::Sell => (
            price * (1.0 - params.target_pct),
            price * (1.0 + params.stop_pct),
        ),
    };

    let profit_pct = round2((target_price - price).abs() / price * 100.0);
    let risk_pct = round2((price - stop_loss).abs() / price * 100.0);
    if risk_pct == 0.0 {
        return Err(PlanError::DivisionByZero);
    }
    let brackets = match signal.direction {
        Direction::Buy => target_price > price && price > stop_loss,
        Direction::Sell => target_price < price && price < stop_loss,
    };
    if !brackets || profit_pct <= 0.0 {
        return Err(PlanError::InvalidParameter(format!(
            "target_pct {} and stop_pct {} do not move levels off price {price}",
            params.target_pct, params.stop_pct
        )));
    }
    let risk_reward_ratio = round2(profit_pct / risk_pct);

    let (confidence_pct, confidence_source) = match signal.confidence {
        Some(c) => (round2(c * 100.0), ConfidenceSource::Model),
        None => (
            round2(params.confidence_floor + rng.next_unit() * params.confidence_spread),
            ConfidenceSource::Synthesized,
        ),
    };

    Ok(TradeLevels {
        target_price,
        stop_loss,
        profit_pct,
        risk_pct,
        risk_reward_ratio,
        confidence_pct,
        confidence_source,
    })
}

/// Build the full plan: levels plus the chart series and metadata.
///
/// The series must already end at the signal's current price (see
/// [`crate::series::anchor_series`]).
pub fn compute_plan(
    signal: &PriceSignal,
    params: &PlanParams,
    chart: ChartSeries,
    generated_at: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> Result<TradePlan, PlanError> {
    let levels = compute_levels(signal, params, rng)?;

    let last = chart.points.last().map(|p| p.price);
    if last != Some(signal.current_price) {
        return Err(PlanError::AnchorMismatch {
            expected: signal.current_price,
            found: last,
        });
    }

    Ok(TradePlan {
        symbol: signal.symbol.clone(),
        company_name: None,
        direction: signal.direction,
        current_price: signal.current_price,
        target_price: levels.target_price,
        stop_loss: levels.stop_loss,
        profit_pct: levels.profit_pct,
        risk_pct: levels.risk_pct,
        risk_reward_ratio: levels.risk_reward_ratio,
        confidence_pct: levels.confidence_pct,
        confidence_source: levels.confidence_source,
        series: chart.points,
        series_origin: chart.origin,
        generated_at,
        holding_period: params.holding_period.clone(),
        details: signal.details.clone(),
    })
}
