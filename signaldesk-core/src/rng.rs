//! Injected randomness.
//!
//! Confidence synthesis and the synthetic series walk both draw from a
//! [`RandomSource`] handed in by the caller, never from a global generator.
//! Production code uses a seeded `StdRng` from [`RngHierarchy`]; tests pass a
//! replayable sequence so every draw is known in advance.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Deterministic RNG hierarchy.
///
/// A master seed is expanded into per-(symbol, iteration) sub-seeds using
/// BLAKE3, so the same master seed gives the same draws for a symbol no
/// matter which symbols were requested before it.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Derive a deterministic sub-seed for a `(symbol, iteration)` pair.
    ///
    /// Symbols are upper-cased first, so `aapl` and `AAPL` share a stream.
    pub fn sub_seed(&self, symbol: &str, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(symbol.trim().to_uppercase().as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded StdRng from a sub-seed.
    pub fn rng_for(&self, symbol: &str, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(symbol, iteration))
    }
}
