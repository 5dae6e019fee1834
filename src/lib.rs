//! # gacha
//!
//! Seeded two-stage weighted draws for loot-box / gacha reward tables.
//!
//! A draw first picks a **rank** (tier) by tier weight, then a **value** inside
//! that rank by its intra-tier weight. Both picks come from one generator
//! seeded from the MD5 digest of a timestamp and an optional identifier, so a
//! draw is a pure function of its [`Seed`] and the configured [`RankTable`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gacha::{GachaSystem, RankTable};
//!
//! # fn main() -> Result<(), gacha::GachaError> {
//! let mut gacha = GachaSystem::new();
//! gacha.setup(&RankTable::default())?;
//!
//! let draw = gacha.pull(Some("player_123"))?;
//! println!("Single Pull: {draw}");
//!
//! for (i, draw) in gacha.pull_multiple(10, Some("player_123"))?.iter().enumerate() {
//!     println!("  {}. {draw}", i + 1);
//! }
//! # Ok(()) }
//! ```
//!
//! ## Replay
//! The timestamp half of a seed cannot be re-obtained later, so replaying a
//! draw means recording the seed: [`GachaSystem::pull_traced`] returns it and
//! [`GachaSystem::pull_with_seed`] draws from it again.
//!
//! ## Gotchas
//! * Weights are relative masses: the chance of item *i* is always
//!   `weight[i] / sum(weights)`, they need not add up to 1.
//! * Weights must be **non-negative** and not all zero; `NaN`/∞ are rejected.
//! * Seeds are reproducible on purpose and are **not** suitable where draws
//!   must be unpredictable.

mod config;
mod cumulative;
mod error;
mod seed;
mod system;

/// A minimal interface for “index samplers”: pick an index in `0..len()`.
/// Implemented by [`CumulativeSampler`]; [`DropTable`] samples through it.
#[allow(clippy::len_without_is_empty)]
pub trait IndexSampler {
    fn len(&self) -> usize;
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

pub use config::{RankSpec, RankTable};
pub use cumulative::CumulativeSampler;
pub use error::{ConfigError, GachaError, ProbError};
pub use seed::{
    Seed, TIMESTAMP_FORMAT, derive_seed, derive_seed_at, timestamp_string, value_fingerprint,
};
pub use system::{Draw, GachaSystem, batch_identifier};

use rand::Rng;

/// A generic “drop table”: associates items with weights and samples them
/// using an internal [`CumulativeSampler`].
///
/// Build it from any iterator of `(item, weight)` where `weight >= 0`.
#[derive(Debug, Clone)]
pub struct DropTable<T> {
    sampler: CumulativeSampler,
    items: Vec<T>,
}

impl<T> DropTable<T> {
    /// Build from any `(item, weight)` iterator.
    ///
    /// # Errors
    /// * [`ProbError::Empty`] if there are no items.
    /// * [`ProbError::Negative`] if any weight is negative.
    /// * [`ProbError::NonFinite`] if any weight is `NaN` or infinite.
    /// * [`ProbError::ZeroSum`] if the sum of weights is zero or not finite.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ProbError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let (items, weights): (Vec<T>, Vec<f64>) = pairs.into_iter().unzip();
        let sampler = CumulativeSampler::new(&weights)?;
        Ok(Self { sampler, items })
    }

    /// Sample an item **by reference** (no `Clone` bound).
    ///
    /// Consumes one `f64` from `rng`.
    pub fn sample<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a T {
        &self.items[IndexSampler::sample_index(&self.sampler, rng)]
    }

    /// Sample an item **by value** (clones the chosen element).
    pub fn sample_owned<R: Rng + ?Sized>(&self, rng: &mut R) -> T
    where
        T: Clone,
    {
        self.sample(rng).clone()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Weights parallel to [`items`](Self::items), as given.
    pub fn weights(&self) -> &[f64] {
        self.sampler.weights()
    }

    pub fn len(&self) -> usize {
        self.sampler.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sampler.is_empty()
    }
}
