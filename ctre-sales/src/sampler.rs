//! Bounded uniform subsampling of the cleaned dataset.

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Shuffle-and-slice sampler. With a seed the result is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    max_size: usize,
    seed: Option<u64>,
}

impl Sampler {
    pub fn new(max_size: usize, seed: Option<u64>) -> Self {
        Self { max_size, seed }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Return at most `max_size` distinct items. Inputs that already fit are
    /// returned untouched, order included.
    pub fn sample<T>(&self, items: Vec<T>) -> Vec<T> {
        if items.len() <= self.max_size {
            return items;
        }
        let total = items.len();
        let sampled = match self.seed {
            Some(seed) => sample_with(items, self.max_size, &mut StdRng::seed_from_u64(seed)),
            None => sample_with(items, self.max_size, &mut rand::rng()),
        };
        info!(
            "Sampled {} of {} records",
            sampled.len(),
            total
        );
        sampled
    }
}

/// Fisher–Yates shuffle of the whole input, then keep the first `max_size`.
pub fn sample_with<T, R: Rng + ?Sized>(mut items: Vec<T>, max_size: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= max_size {
        return items;
    }
    items.shuffle(rng);
    items.truncate(max_size);
    items
}
