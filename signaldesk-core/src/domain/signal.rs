use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::plan::PlanError;

/// Trade direction carried by a prediction signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive: `"buy"`, `" Buy "` and `"BUY"` all parse.
impl FromStr for Direction {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Direction::Buy),
            "SELL" => Ok(Direction::Sell),
            _ => Err(PlanError::UnknownSignal(s.to_string())),
        }
    }
}

/// Indicator snapshot returned by the prediction backend next to the signal.
///
/// Display-only. Nothing in the plan calculation reads these values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalDetails {
    pub rsi: Option<f64>,
    pub volatility: Option<f64>,
    pub ma_50: Option<f64>,
}

/// A prediction lookup that came back without an upstream error.
///
/// The direction is still the raw string the predictor sent; converting to
/// a [`PriceSignal`] is where it gets validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalQuote {
    pub symbol: String,
    pub current_price: f64,
    pub prediction: String,
    pub confidence: Option<f64>,
    pub details: Option<SignalDetails>,
}

/// A validated prediction signal. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSignal {
    pub symbol: String,
    pub current_price: f64,
    pub direction: Direction,
    /// Model confidence in `[0, 1]`, if the predictor supplied one.
    pub confidence: Option<f64>,
    pub details: Option<SignalDetails>,
}

impl PriceSignal {
    pub fn new(symbol: impl Into<String>, current_price: f64, direction: Direction) -> Self {
        Self {
            symbol: symbol.into(),
            current_price,
            direction,
            confidence: None,
            details: None,
        }
    }

    /// Attach a model confidence. Values are clamped into `[0, 1]`; NaN is dropped.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = normalize_confidence(Some(confidence));
        self
    }
}

impl TryFrom<SignalQuote> for PriceSignal {
    type Error = PlanError;

    fn try_from(quote: SignalQuote) -> Result<Self, Self::Error> {
        if !quote.current_price.is_finite() || quote.current_price <= 0.0 {
            return Err(PlanError::InvalidPrice(quote.current_price));
        }
        let direction: Direction = quote.prediction.parse()?;
        Ok(Self {
            symbol: quote.symbol.trim().to_uppercase(),
            current_price: quote.current_price,
            direction,
            confidence: normalize_confidence(quote.confidence),
            details: quote.details,
        })
    }
}

fn normalize_confidence(confidence: Option<f64>) -> Option<f64> {
    confidence
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
}
