//! Deterministic random stream: the only source of randomness during generation.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded pseudo-random stream.
///
/// Backed by ChaCha8 so a seed yields the same stream on every platform and
/// across `rand` releases. Every helper consumes a fixed number of draws for a
/// given input, which keeps the whole forest reproducible.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fair coin.
    pub fn coin(&mut self) -> bool {
        self.inner.gen::<bool>()
    }

    /// `true` with probability `p`. Always draws, even for `p` of 0 or 1.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p
    }

    /// Uniform index into a collection of `len` items, `None` when empty.
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// `amount` distinct indices from `0..len` in draw order, `None` if `amount > len`.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Option<Vec<usize>> {
        if amount > len {
            return None;
        }
        Some(index::sample(&mut self.inner, len, amount).into_vec())
    }
}
