//! Chart series: synthetic generation and upstream normalization.
//!
//! When the history service has nothing for a symbol, the screen still shows
//! a 30-day chart. The generator walks a price up from 85% of the current
//! price with a slight upward bias and pins the final point to the exact
//! current price.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::data::wire::HistoryRecord;
use crate::domain::point::ANCHOR_LABEL;
use crate::domain::{PricePoint, SeriesOrigin};
use crate::plan::round2;
use crate::rng::RandomSource;

/// Walk starts this fraction of the way to the anchor.
const START_FRACTION: f64 = 0.85;
/// Draws above this value move the walk up; the 0.05 gap is the upward drift.
const DRIFT_CENTER: f64 = 0.45;
/// Step size as a fraction of the anchor price.
const STEP_FRACTION: f64 = 0.02;
/// Lowest price a synthetic point may take.
pub const MIN_PRICE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("invalid anchor price {0}: must be a positive number")]
    InvalidPrice(f64),

    #[error("series window must cover at least one day")]
    EmptyWindow,
}

/// A chart series tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub points: Vec<PricePoint>,
    pub origin: SeriesOrigin,
}

/// Generate `num_days + 1` points ending at exactly `current_price`.
///
/// Every call starts a fresh walk. Intermediate points are decorative and only
/// guaranteed to be at least [`MIN_PRICE`].
pub fn generate_series(
    current_price: f64,
    num_days: usize,
    today: NaiveDate,
    rng: &mut dyn RandomSource,
) -> Result<Vec<PricePoint>, SeriesError> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(SeriesError::InvalidPrice(current_price));
    }
    if num_days == 0 {
        return Err(SeriesError::EmptyWindow);
    }

    let mut points = Vec::with_capacity(num_days + 1);
    let mut price = current_price * START_FRACTION;

    for i in 0..num_days {
        let delta = (rng.next_unit() - DRIFT_CENTER) * current_price * STEP_FRACTION;
        price = (price + delta).max(MIN_PRICE);

        let days_back = (num_days - i) as i64;
        let label = (today - Duration::days(days_back))
            .format("%b %-d")
            .to_string();
        points.push(PricePoint::new(i, label, round2(price).max(MIN_PRICE)));
    }

    points.push(PricePoint::new(num_days, ANCHOR_LABEL, current_price));
    Ok(points)
}

/// Convert history-service records into an anchored series.
///
/// Records with non-finite or non-positive prices are dropped. Returns `None`
/// when nothing usable remains, so the caller can fall back to the generator.
pub fn series_from_records(records: &[HistoryRecord], current_price: f64) -> Option<Vec<PricePoint>> {
    let points: Vec<PricePoint> = records
        .iter()
        .filter(|r| r.price.is_finite() && r.price > 0.0)
        .enumerate()
        .map(|(i, r)| PricePoint::new(i, r.label.clone(), r.price))
        .collect();

    if points.is_empty() {
        return None;
    }
    Some(anchor_series(points, current_price))
}

/// Make sure the series ends with an anchor point at `current_price`.
///
/// A series already ending at the exact price is returned unchanged;
/// otherwise a `"Today"` point is appended with the next index.
pub fn anchor_series(mut points: Vec<PricePoint>, current_price: f64) -> Vec<PricePoint> {
    if points.last().map(|p| p.price) == Some(current_price) {
        return points;
    }
    let index = points.last().map_or(0, |p| p.index + 1);
    points.push(PricePoint::new(index, ANCHOR_LABEL, current_price));
    points
}
