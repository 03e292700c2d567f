//! Injectable randomness
//!
//! The draw, the shuffle and the choice among duplicate segments all pull
//! from a `RandomSource`. Live events use an entropy-seeded `SeededRandom`;
//! tests use `SeededRandom::seeded` or a scripted `SequenceRandom`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform floats in `[0, 1)`. Not required to be cryptographic.
pub trait RandomSource {
    fn next_float(&mut self) -> f64;

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() called with an empty range");
        let idx = (self.next_float() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

/// `StdRng`-backed source
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "SequenceRandom values must lie in [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// Always returns the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRandom {
    fn next_float(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
