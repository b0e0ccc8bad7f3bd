//! Domain types for SignalDesk

pub mod candidate;
pub mod plan;
pub mod point;
pub mod signal;

pub use candidate::SearchCandidate;
pub use plan::{ConfidenceSource, SeriesOrigin, TradePlan};
pub use point::PricePoint;
pub use signal::{Direction, PriceSignal, SignalDetails, SignalQuote};
