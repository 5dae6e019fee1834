//! Cumulative-weight inversion for sampling from a discrete distribution.

use crate::IndexSampler;
use crate::error::ProbError;
use rand::Rng;

/// Running sums over a weight slice, sampled by inverting one uniform draw.
///
/// Each draw consumes exactly one `f64` from the generator, so two tables
/// sampled in sequence from the same generator stay reproducible for a given
/// seed.
#[derive(Debug, Clone)]
pub struct CumulativeSampler {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
    // index of the last item with positive weight; guards float round-off at the top end
    last: usize,
}

impl CumulativeSampler {
    /// Build from non-negative weights. O(n).
    pub fn new(weights: &[f64]) -> Result<Self, ProbError> {
        if weights.is_empty() {
            return Err(ProbError::Empty);
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut sum = 0.0f64;
        let mut last = 0;
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(ProbError::NonFinite { index: i, value: w });
            }
            if w < 0.0 {
                return Err(ProbError::Negative { index: i, value: w });
            }
            if w > 0.0 {
                last = i;
            }
            sum += w;
            cumulative.push(sum);
        }
        if !sum.is_finite() || sum == 0.0 {
            return Err(ProbError::ZeroSum);
        }

        Ok(Self {
            weights: weights.to_vec(),
            cumulative,
            last,
        })
    }

    /// Draw `u` in `[0, total)` and return the first index whose cumulative
    /// sum exceeds it. Zero-weight items are never returned.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u = rng.random::<f64>() * self.total();
        self.cumulative
            .partition_point(|&c| c <= u)
            .min(self.last)
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        // non-empty by construction
        self.cumulative[self.cumulative.len() - 1]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Selection probability of index `i`, or `None` when out of range.
    pub fn probability(&self, i: usize) -> Option<f64> {
        self.weights.get(i).map(|w| w / self.total())
    }

    #[cfg(test)]
    pub fn sample_counts<R: Rng + ?Sized>(&self, rng: &mut R, draws: usize) -> Vec<usize> {
        let mut counts = vec![0usize; self.weights.len()];
        for _ in 0..draws {
            counts[self.sample_index(rng)] += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl IndexSampler for CumulativeSampler {
    #[inline]
    fn len(&self) -> usize {
        // call the inherent method explicitly to avoid trait-recursion
        CumulativeSampler::len(self)
    }
    #[inline]
    fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        CumulativeSampler::sample_index(self, rng)
    }
}
