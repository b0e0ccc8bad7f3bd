//! Fixtures shared by unit and integration tests.
//!
//! Compiled for this crate's own tests and behind the `test-helpers` feature
//! for dependents.

use crate::rng::RandomSource;

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Values are clamped into `[0, 1)` so a careless fixture cannot produce
/// draws a real generator never would.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        if v.is_finite() {
            v.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }
}
