//! Injectable randomness
//!
//! The simulation never reaches for an ambient RNG. Callers hand it a
//! [`RandomSource`]; any `rand` generator qualifies, and tests can script
//! exact values.

use rand::{Rng, RngCore};

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;

    /// Uniform sample from `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRandom {
    samples: Vec<f32>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(samples: &[f32]) -> Self {
        assert!(!samples.is_empty());
        Self {
            samples: samples.to_vec(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        value
    }
}
