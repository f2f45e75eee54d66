use crate::*;
pub use random::*;

mod random;

/// Uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for rand::rngs::SmallRng {
    fn next_unit(&mut self) -> f64 {
        use rand::prelude::*;
        self.random::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Creates the default random source from a seed.
pub fn seeded_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Replays a fixed list of draws, wrapping around at the end. An empty script always yields `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    index: usize,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            index: 0,
        }
    }

    /// Appends draws to the end of the script.
    pub fn extend(&mut self, draws: impl IntoIterator<Item = f64>) {
        self.draws.extend(draws);
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.;
        }
        let draw = self.draws[self.index % self.draws.len()];
        self.index += 1;
        draw
    }
}

pub trait CellGenerator {
    fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> CellValue;
}

/// Maps a unit draw onto `0..len`, never yielding `len` itself.
pub(crate) fn unit_to_index(draw: f64, len: usize) -> usize {
    ((draw * len as f64) as usize).min(len.saturating_sub(1))
}
