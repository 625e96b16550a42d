//! Robustness sweeps over removal fractions.
//!
//! An [`AttackSimulator`] repeatedly removes a fraction of a network's
//! vertices or edges and measures the surviving giant component relative to
//! the original vertex count. Each `(fraction, trial)` pair draws from its own
//! seeded random stream, so sweeps reproduce exactly regardless of whether
//! trials run sequentially or on rayon workers.

mod builder;
mod protection;

use std::{collections::HashSet, num::NonZeroUsize};

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    components::{ComponentExtractor, UnionFindExtractor},
    error::AttackError,
    network::{Edge, Network, VertexId},
    selection::{removal_count, top_fraction},
    statistics::{AttackRecord, FractionSamples, summarize},
};

pub use self::{builder::AttackSimulatorBuilder, protection::Protection};

/// SplitMix64 increment used to spread trial seeds.
const SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// What each trial removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackStrategy {
    /// Uniformly random vertices, without replacement.
    RandomNode,
    /// Uniformly random edges, without replacement.
    RandomEdge,
    /// Highest-degree vertices first.
    TargetedNode,
}

/// How an [`AttackSimulator`] schedules its trials.
///
/// `Auto` fans trials out over rayon when the `parallel` feature is enabled
/// and runs them in order otherwise.
///
/// # Examples
/// ```
/// use hrgnet_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Sequential;
/// assert!(matches!(strategy, ExecutionStrategy::Sequential));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Let the library choose.
    Auto,
    /// Run every trial on the calling thread.
    Sequential,
    /// Run trials on the rayon thread pool.
    Parallel,
}

/// Configured robustness sweep.
///
/// # Examples
/// ```
/// use hrgnet_core::{AttackSimulatorBuilder, AttackStrategy, Edge, Network};
///
/// let star = Network::from_edges(5, (1..5).map(|leaf| Edge::new(0, leaf)));
/// let simulator = AttackSimulatorBuilder::new()
///     .with_fractions([0.0, 0.2])
///     .with_trials(1)
///     .with_strategy(AttackStrategy::TargetedNode)
///     .build()?;
/// let records = simulator.run(&star)?;
/// assert_eq!(records[0].mean(), 1.0);
/// assert_eq!(records[1].mean(), 0.2);
/// # Ok::<(), hrgnet_core::AttackError>(())
/// ```
#[derive(Clone, Debug)]
pub struct AttackSimulator<E = UnionFindExtractor> {
    fractions: Vec<f64>,
    trials: NonZeroUsize,
    strategy: AttackStrategy,
    protection: Option<Protection>,
    seed: u64,
    execution_strategy: ExecutionStrategy,
    extractor: E,
}

impl<E> AttackSimulator<E> {
    /// Returns the removal-fraction grid in sweep order.
    #[must_use]
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Returns the number of trials per fraction.
    #[must_use]
    pub const fn trials(&self) -> NonZeroUsize {
        self.trials
    }

    /// Returns the removal strategy.
    #[must_use]
    pub const fn strategy(&self) -> AttackStrategy {
        self.strategy
    }

    /// Returns the protection set, if any.
    #[must_use]
    pub const fn protection(&self) -> Option<&Protection> {
        self.protection.as_ref()
    }

    /// Returns the base seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }
}

impl<E: ComponentExtractor + Sync> AttackSimulator<E> {
    /// Runs the sweep and reduces it to one [`AttackRecord`] per fraction.
    ///
    /// # Errors
    /// Returns [`AttackError::InvalidFraction`] when a fraction asks for more
    /// victims than the unprotected population holds, and
    /// [`AttackError::BackendUnavailable`] when parallel execution is requested
    /// from a build without the `parallel` feature.
    #[instrument(
        name = "core.attack.run",
        err,
        skip(self, network),
        fields(
            vertices = network.vertex_count(),
            edges = network.edge_count(),
            fractions = self.fractions.len(),
            trials = self.trials.get(),
            strategy = ?self.strategy,
            protected = self.protection.is_some(),
            execution = ?self.execution_strategy,
        ),
    )]
    pub fn run(&self, network: &Network) -> Result<Vec<AttackRecord>, AttackError> {
        let samples = self.sample(network)?;
        let records = summarize(samples)?;
        info!(records = records.len(), "attack sweep complete");
        Ok(records)
    }

    /// Runs the sweep and returns the raw samples, grouped per fraction in
    /// grid order.
    ///
    /// # Errors
    /// Same as [`AttackSimulator::run`].
    pub fn sample(&self, network: &Network) -> Result<Vec<FractionSamples>, AttackError> {
        let trials = self.trials.get();
        let jobs: Vec<(usize, usize)> = (0..self.fractions.len())
            .flat_map(|fraction| (0..trials).map(move |trial| (fraction, trial)))
            .collect();
        let values = self.execute(network, &jobs)?;

        Ok(self
            .fractions
            .iter()
            .zip(values.chunks(trials))
            .map(|(&fraction, chunk)| {
                debug!(fraction, trials = chunk.len(), "fraction sampled");
                FractionSamples::new(fraction, chunk.to_vec())
            })
            .collect())
    }

    /// Runs a single trial at `fraction`, returning the rescaled giant
    /// component size.
    ///
    /// The result is `0.0` when no vertex survives.
    ///
    /// # Errors
    /// Returns [`AttackError::FractionOutOfRange`] for a fraction outside
    /// `[0, 1]` and [`AttackError::InvalidFraction`] when the victim count
    /// exceeds the unprotected population.
    pub fn run_trial<R: Rng + ?Sized>(
        &self,
        network: &Network,
        fraction: f64,
        rng: &mut R,
    ) -> Result<f64, AttackError> {
        check_fraction(fraction)?;
        let population = network.vertex_count();
        let mut attacked = network.clone();
        match self.strategy {
            AttackStrategy::RandomNode => {
                for vertex in self.random_vertices(network, fraction, rng)? {
                    attacked.remove_vertex(vertex);
                }
            }
            AttackStrategy::TargetedNode => {
                for vertex in self.targeted_vertices(network, fraction)? {
                    attacked.remove_vertex(vertex);
                }
            }
            AttackStrategy::RandomEdge => {
                for edge in self.random_edges(network, fraction, rng)? {
                    attacked.remove_edge(edge);
                }
            }
        }
        if population == 0 || attacked.vertex_count() == 0 {
            return Ok(0.0);
        }
        let giant = self.extractor.largest_component_size(&attacked);
        Ok(rescale(giant, population))
    }

    fn execute(&self, network: &Network, jobs: &[(usize, usize)]) -> Result<Vec<f64>, AttackError> {
        let trial = |&(fraction_index, trial_index): &(usize, usize)| {
            let mut rng = SmallRng::seed_from_u64(trial_seed(self.seed, fraction_index, trial_index));
            self.run_trial(network, self.fractions[fraction_index], &mut rng)
        };
        match self.execution_strategy {
            #[cfg(feature = "parallel")]
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => {
                jobs.par_iter().map(trial).collect()
            }
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Auto => jobs.iter().map(trial).collect(),
            #[cfg(not(feature = "parallel"))]
            ExecutionStrategy::Parallel => Err(AttackError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }),
            ExecutionStrategy::Sequential => jobs.iter().map(trial).collect(),
        }
    }

    fn random_vertices<R: Rng + ?Sized>(
        &self,
        network: &Network,
        fraction: f64,
        rng: &mut R,
    ) -> Result<Vec<VertexId>, AttackError> {
        let candidates: Vec<VertexId> = network
            .vertices()
            .filter(|&vertex| !self.protects_vertex(vertex))
            .collect();
        let requested = removal_count(network.vertex_count(), fraction);
        sample_victims(&candidates, requested, fraction, rng)
    }

    fn targeted_vertices(
        &self,
        network: &Network,
        fraction: f64,
    ) -> Result<Vec<VertexId>, AttackError> {
        let unprotected = HashSet::new();
        let exclude = self
            .protection
            .as_ref()
            .map_or(&unprotected, Protection::vertices);
        let requested = removal_count(network.vertex_count(), fraction);
        let victims = top_fraction(network, fraction, exclude);
        if victims.len() < requested {
            return Err(AttackError::InvalidFraction {
                fraction,
                requested,
                available: victims.len(),
            });
        }
        Ok(victims)
    }

    fn random_edges<R: Rng + ?Sized>(
        &self,
        network: &Network,
        fraction: f64,
        rng: &mut R,
    ) -> Result<Vec<Edge>, AttackError> {
        let candidates: Vec<Edge> = network
            .edges()
            .into_iter()
            .filter(|&edge| !self.protects_edge(edge))
            .collect();
        let requested = removal_count(network.edge_count(), fraction);
        sample_victims(&candidates, requested, fraction, rng)
    }

    fn protects_vertex(&self, vertex: VertexId) -> bool {
        self.protection
            .as_ref()
            .is_some_and(|protection| protection.protects_vertex(vertex))
    }

    fn protects_edge(&self, edge: Edge) -> bool {
        self.protection
            .as_ref()
            .is_some_and(|protection| protection.protects_edge(edge))
    }
}

fn sample_victims<T: Copy, R: Rng + ?Sized>(
    candidates: &[T],
    requested: usize,
    fraction: f64,
    rng: &mut R,
) -> Result<Vec<T>, AttackError> {
    if requested > candidates.len() {
        return Err(AttackError::InvalidFraction {
            fraction,
            requested,
            available: candidates.len(),
        });
    }
    Ok(index::sample(rng, candidates.len(), requested)
        .into_iter()
        .map(|position| candidates[position])
        .collect())
}

pub(crate) fn check_fraction(fraction: f64) -> Result<(), AttackError> {
    if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(AttackError::FractionOutOfRange { fraction })
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "vertex counts stay far below 2^52"
)]
fn rescale(giant: usize, population: usize) -> f64 {
    giant as f64 / population as f64
}

/// Derives the seed of one `(fraction, trial)` pair from the sweep seed.
fn trial_seed(seed: u64, fraction: usize, trial: usize) -> u64 {
    let fraction_seed = splitmix64(seed ^ (fraction as u64 + 1).wrapping_mul(SEED_SPACING));
    splitmix64(fraction_seed ^ (trial as u64 + 1).wrapping_mul(SEED_SPACING))
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

#[cfg(test)]
mod tests;
