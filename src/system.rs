use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use log::{debug, trace};

use crate::DropTable;
use crate::config::RankTable;
use crate::error::{ConfigError, GachaError};
use crate::seed::{self, Seed};

/// One draw: a rank and a value from that rank, borrowed from the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Draw<'a> {
    pub rank: &'a str,
    pub value: &'a str,
}

impl fmt::Display for Draw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.rank, self.value)
    }
}

#[derive(Debug, Clone)]
struct Tier {
    name: String,
    values: DropTable<String>,
}

/// Validated snapshot of a [`RankTable`]. Replaced whole on every setup.
#[derive(Debug, Clone)]
struct SamplerState {
    tiers: DropTable<Tier>,
    value_seeds: Vec<u128>,
}

impl SamplerState {
    fn build(table: &RankTable) -> Result<Self, ConfigError> {
        if table.is_empty() {
            return Err(ConfigError::EmptyTable);
        }

        let mut seen = HashSet::new();
        let mut tiers = Vec::with_capacity(table.len());
        let mut value_seeds = Vec::new();
        for spec in &table.ranks {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateRank(spec.name.clone()));
            }
            if spec.values.is_empty() {
                return Err(ConfigError::EmptyValues(spec.name.clone()));
            }
            if spec.values.len() != spec.weights.len() {
                return Err(ConfigError::LengthMismatch {
                    rank: spec.name.clone(),
                    values: spec.values.len(),
                    weights: spec.weights.len(),
                });
            }

            let values = DropTable::from_pairs(
                spec.values.iter().cloned().zip(spec.weights.iter().copied()),
            )
            .map_err(|source| ConfigError::ValueWeights {
                rank: spec.name.clone(),
                source,
            })?;

            for value in &spec.values {
                let fingerprint = seed::value_fingerprint(&spec.name, value, value_seeds.len());
                trace!("fingerprint {}/{value}: {fingerprint:032x}", spec.name);
                value_seeds.push(fingerprint);
            }

            let tier = Tier {
                name: spec.name.clone(),
                values,
            };
            tiers.push((tier, spec.weight));
        }

        let tiers = DropTable::from_pairs(tiers).map_err(ConfigError::TierWeights)?;
        Ok(Self { tiers, value_seeds })
    }

    fn tier(&self, rank: &str) -> Option<&Tier> {
        self.tiers.items().iter().find(|t| t.name == rank)
    }
}

/// Identifier for the `index`-th draw of a batch: `"{identifier}_{index}"`,
/// or the bare index when no identifier is given.
pub fn batch_identifier(identifier: Option<&str>, index: usize) -> String {
    match identifier.filter(|id| !id.is_empty()) {
        Some(id) => format!("{id}_{index}"),
        None => index.to_string(),
    }
}

/// Two-stage weighted sampler over a [`RankTable`].
///
/// Draws never mutate the system; `setup` needs `&mut self`, so a table
/// cannot be swapped while any [`Draw`] borrowed from the old one is alive.
#[derive(Debug, Clone)]
pub struct GachaSystem {
    state: Option<SamplerState>,
    // `None` reads local time
    clock: Option<fn() -> NaiveDateTime>,
}

impl Default for GachaSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl GachaSystem {
    /// An empty system; every draw fails with [`GachaError::Uninitialized`]
    /// until [`setup`](Self::setup) succeeds.
    pub fn new() -> Self {
        Self {
            state: None,
            clock: None,
        }
    }

    /// A system reading timestamps from `clock` instead of local time.
    pub fn with_clock(clock: fn() -> NaiveDateTime) -> Self {
        Self {
            state: None,
            clock: Some(clock),
        }
    }

    /// Validate `table` and replace the current state with it.
    ///
    /// On error the previous state, if any, is left untouched.
    pub fn setup(&mut self, table: &RankTable) -> Result<(), GachaError> {
        let state = SamplerState::build(table)?;
        debug!(
            "gacha setup: {} ranks, {} values",
            state.tiers.len(),
            state.value_seeds.len()
        );
        self.state = Some(state);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    fn state(&self) -> Result<&SamplerState, GachaError> {
        self.state.as_ref().ok_or(GachaError::Uninitialized)
    }

    /// Rank names in table order. Empty before setup.
    pub fn ranks(&self) -> impl Iterator<Item = &str> {
        self.state
            .iter()
            .flat_map(|s| s.tiers.items().iter().map(|t| t.name.as_str()))
    }

    /// Tier weights parallel to [`ranks`](Self::ranks).
    pub fn tier_weights(&self) -> &[f64] {
        self.state.as_ref().map(|s| s.tiers.weights()).unwrap_or_default()
    }

    pub fn values(&self, rank: &str) -> Option<&[String]> {
        let tier = self.state.as_ref()?.tier(rank)?;
        Some(tier.values.items())
    }

    pub fn value_weights(&self, rank: &str) -> Option<&[f64]> {
        let tier = self.state.as_ref()?.tier(rank)?;
        Some(tier.values.weights())
    }

    /// Per-value identity hashes in table order. Informational only.
    pub fn value_seeds(&self) -> &[u128] {
        self.state.as_ref().map(|s| s.value_seeds.as_slice()).unwrap_or_default()
    }

    /// Seed from the current clock reading and `identifier`.
    pub fn derive_seed(&self, identifier: Option<&str>) -> Seed {
        match self.clock {
            Some(clock) => seed::derive_seed_at(&clock(), identifier),
            None => seed::derive_seed(identifier),
        }
    }

    /// Draw from a known seed. Same seed and table, same draw.
    pub fn pull_with_seed(&self, seed: Seed) -> Result<Draw<'_>, GachaError> {
        let state = self.state()?;
        let mut rng = seed.rng();
        let tier = state.tiers.sample(&mut rng);
        let value = tier.values.sample(&mut rng);
        Ok(Draw {
            rank: &tier.name,
            value,
        })
    }

    /// Like [`pull`](Self::pull), also returning the seed so the draw can be
    /// replayed with [`pull_with_seed`](Self::pull_with_seed).
    pub fn pull_traced(&self, identifier: Option<&str>) -> Result<(Seed, Draw<'_>), GachaError> {
        self.state()?;
        let seed = self.derive_seed(identifier);
        let draw = self.pull_with_seed(seed)?;
        debug!("pull {identifier:?}: seed {seed} -> {draw}");
        Ok((seed, draw))
    }

    pub fn pull(&self, identifier: Option<&str>) -> Result<Draw<'_>, GachaError> {
        self.pull_traced(identifier).map(|(_, draw)| draw)
    }

    /// `count` draws, the `i`-th seeded with [`batch_identifier`]`(identifier, i)`
    /// so draws within one clock tick still differ.
    ///
    /// # Errors
    /// [`GachaError::InvalidArgument`] when `count` is negative or does not fit
    /// in `usize`.
    pub fn pull_multiple<C>(
        &self,
        count: C,
        identifier: Option<&str>,
    ) -> Result<Vec<Draw<'_>>, GachaError>
    where
        C: TryInto<usize> + Copy + fmt::Display,
    {
        self.state()?;
        let n: usize = count.try_into().map_err(|_| {
            GachaError::InvalidArgument(format!("{count} is not a non-negative count"))
        })?;
        (0..n)
            .map(|i| self.pull(Some(&batch_identifier(identifier, i))))
            .collect()
    }

    /// Draw counts per rank, in rank order. Ranks never drawn count zero.
    pub fn tally<'a>(&'a self, draws: &[Draw<'_>]) -> Vec<(&'a str, usize)> {
        self.ranks()
            .map(|rank| (rank, draws.iter().filter(|d| d.rank == rank).count()))
            .collect()
    }
}
