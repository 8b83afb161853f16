//! Biased-randomised selection over an ordered list.

use rand::Rng;

use super::config::BiasFunction;

/// A lazy, consuming permutation generator biased toward the front of its
/// input.
///
/// Built from a list sorted best-to-worst, the selector yields every item
/// exactly once. Under the quasi-geometric policy the index drawn at each
/// step is `floor(ln u / ln(1 - beta)) mod remaining`, so index 0 is the
/// most probable and later indices exponentially less so. The modulo
/// wrap-around is deliberate: rare draws past the end of the pool fold back
/// onto early indices rather than clamping to the last one, which would
/// shift the selection distribution.
///
/// The input list is consumed; pass a copy if the order matters afterwards.
///
/// # Examples
///
/// ```
/// use cws_routing::solver::{BiasFunction, BiasedSelector};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let selector = BiasedSelector::new(vec![10, 20, 30], BiasFunction::default(), &mut rng)
///     .expect("valid bias");
/// let mut drawn: Vec<i32> = selector.collect();
/// drawn.sort_unstable();
/// assert_eq!(drawn, vec![10, 20, 30]);
/// ```
#[derive(Debug)]
pub struct BiasedSelector<'r, T, R: Rng> {
    pool: Vec<T>,
    bias: BiasFunction,
    rng: &'r mut R,
}

impl<'r, T, R: Rng> BiasedSelector<'r, T, R> {
    /// Creates a selector over the given best-to-worst pool.
    ///
    /// Fails when the quasi-geometric `beta` lies outside (0, 1): `beta = 0`
    /// would put `ln(1 - beta) = 0` in a denominator.
    pub fn new(pool: Vec<T>, bias: BiasFunction, rng: &'r mut R) -> Result<Self, String> {
        if let BiasFunction::QuasiGeometric { beta } = bias {
            if !(beta > 0.0 && beta < 1.0) {
                return Err(format!(
                    "quasi-geometric beta must be in (0, 1), got {beta}"
                ));
            }
        }
        Ok(Self { pool, bias, rng })
    }

    /// Number of items not yet yielded.
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    fn draw_index(&mut self) -> usize {
        let remaining = self.pool.len();
        match self.bias {
            BiasFunction::QuasiGeometric { beta } => {
                // u = 0 gives ln(u) = -inf; the cast saturates and the
                // modulo still lands in range
                let u: f64 = self.rng.random();
                let raw = u.ln() / (1.0 - beta).ln();
                (raw as usize) % remaining
            }
            BiasFunction::Uniform => self.rng.random_range(0..remaining),
        }
    }
}

impl<'r, T, R: Rng> Iterator for BiasedSelector<'r, T, R> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.pool.is_empty() {
            return None;
        }
        let idx = self.draw_index();
        // preserves the order of the remaining pool
        Some(self.pool.remove(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pool.len(), Some(self.pool.len()))
    }
}

impl<'r, T, R: Rng> ExactSizeIterator for BiasedSelector<'r, T, R> {}
