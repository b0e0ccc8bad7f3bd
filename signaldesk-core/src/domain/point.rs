use serde::{Deserialize, Serialize};

/// Label given to the anchor point of every series.
pub const ANCHOR_LABEL: &str = "Today";

/// One point of a chartable daily price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub index: usize,
    pub label: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(index: usize, label: impl Into<String>, price: f64) -> Self {
        Self {
            index,
            label: label.into(),
            price,
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.label == ANCHOR_LABEL
    }
}
