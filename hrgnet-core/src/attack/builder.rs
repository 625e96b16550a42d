//! Builder utilities for configuring attack sweeps.
//!
//! Validation happens once in [`AttackSimulatorBuilder::build`], so a
//! constructed [`AttackSimulator`] always carries a usable grid and trial
//! count.

use std::num::NonZeroUsize;

use crate::{
    components::UnionFindExtractor,
    error::AttackError,
    statistics::linspace,
};

use super::{AttackSimulator, AttackStrategy, ExecutionStrategy, Protection, check_fraction};

const DEFAULT_GRID_STEPS: usize = 11;
const DEFAULT_TRIALS: usize = 10;
const DEFAULT_SEED: u64 = 42;

/// Configures and constructs [`AttackSimulator`] instances.
///
/// # Examples
/// ```
/// use hrgnet_core::{AttackSimulatorBuilder, AttackStrategy, ExecutionStrategy};
///
/// let simulator = AttackSimulatorBuilder::new()
///     .with_trials(4)
///     .with_strategy(AttackStrategy::RandomEdge)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(simulator.trials().get(), 4);
/// assert_eq!(simulator.fractions().len(), 11);
/// assert_eq!(simulator.strategy(), AttackStrategy::RandomEdge);
/// ```
#[derive(Clone, Debug)]
pub struct AttackSimulatorBuilder<E = UnionFindExtractor> {
    fractions: Vec<f64>,
    trials: usize,
    strategy: AttackStrategy,
    protection: Option<Protection>,
    seed: u64,
    execution_strategy: ExecutionStrategy,
    extractor: E,
}

impl Default for AttackSimulatorBuilder {
    fn default() -> Self {
        Self {
            fractions: linspace(0.0, 1.0, DEFAULT_GRID_STEPS),
            trials: DEFAULT_TRIALS,
            strategy: AttackStrategy::RandomNode,
            protection: None,
            seed: DEFAULT_SEED,
            execution_strategy: ExecutionStrategy::Auto,
            extractor: UnionFindExtractor,
        }
    }
}

impl AttackSimulatorBuilder {
    /// Creates a builder populated with default parameters: eleven fractions
    /// from `0.0` to `1.0`, ten trials, random node removal, no protection,
    /// seed `42`, and automatic execution.
    ///
    /// # Examples
    /// ```
    /// use hrgnet_core::{AttackSimulatorBuilder, AttackStrategy, ExecutionStrategy};
    ///
    /// let builder = AttackSimulatorBuilder::new();
    /// assert_eq!(builder.trials(), 10);
    /// assert_eq!(builder.seed(), 42);
    /// assert_eq!(builder.strategy(), AttackStrategy::RandomNode);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E> AttackSimulatorBuilder<E> {
    /// Replaces the removal-fraction grid.
    #[must_use]
    pub fn with_fractions(mut self, fractions: impl IntoIterator<Item = f64>) -> Self {
        self.fractions = fractions.into_iter().collect();
        self
    }

    /// Returns the configured fraction grid.
    #[must_use]
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Overrides the number of trials per fraction.
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Returns the configured number of trials per fraction.
    #[must_use]
    pub const fn trials(&self) -> usize {
        self.trials
    }

    /// Sets the removal strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: AttackStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured removal strategy.
    #[must_use]
    pub const fn strategy(&self) -> AttackStrategy {
        self.strategy
    }

    /// Protects the given edges and vertices from removal.
    ///
    /// An empty set is dropped at build time, so the sweep runs unprotected.
    ///
    /// # Examples
    /// ```
    /// use hrgnet_core::{AttackSimulatorBuilder, Edge, Protection};
    ///
    /// let builder = AttackSimulatorBuilder::new()
    ///     .with_protection(Protection::from_bridges([Edge::new(0, 1)]));
    /// assert!(builder.protection().is_some_and(|p| p.protects_vertex(1)));
    /// ```
    #[must_use]
    pub fn with_protection(mut self, protection: Protection) -> Self {
        self.protection = Some(protection);
        self
    }

    /// Returns the configured protection set, if any.
    #[must_use]
    pub const fn protection(&self) -> Option<&Protection> {
        self.protection.as_ref()
    }

    /// Sets the base seed from which every trial stream is derived.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets how trials are scheduled.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub const fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Swaps the giant-component extractor.
    ///
    /// # Examples
    /// ```
    /// use hrgnet_core::{AttackSimulatorBuilder, Network};
    ///
    /// let simulator = AttackSimulatorBuilder::new()
    ///     .with_fractions([0.0])
    ///     .with_trials(1)
    ///     .with_extractor(|network: &Network| network.vertex_count())
    ///     .build()?;
    /// let records = simulator.run(&Network::with_vertices(3))?;
    /// assert_eq!(records[0].mean(), 1.0);
    /// # Ok::<(), hrgnet_core::AttackError>(())
    /// ```
    #[must_use]
    pub fn with_extractor<F>(self, extractor: F) -> AttackSimulatorBuilder<F> {
        AttackSimulatorBuilder {
            fractions: self.fractions,
            trials: self.trials,
            strategy: self.strategy,
            protection: self.protection,
            seed: self.seed,
            execution_strategy: self.execution_strategy,
            extractor,
        }
    }

    /// Validates the configuration and constructs an [`AttackSimulator`].
    ///
    /// # Errors
    /// Returns [`AttackError::EmptyGrid`] for an empty grid,
    /// [`AttackError::FractionOutOfRange`] for a fraction outside `[0, 1]`,
    /// and [`AttackError::ZeroTrials`] when no trials are requested.
    pub fn build(self) -> Result<AttackSimulator<E>, AttackError> {
        if self.fractions.is_empty() {
            return Err(AttackError::EmptyGrid);
        }
        for &fraction in &self.fractions {
            check_fraction(fraction)?;
        }
        let trials = NonZeroUsize::new(self.trials).ok_or(AttackError::ZeroTrials)?;

        Ok(AttackSimulator {
            fractions: self.fractions,
            trials,
            strategy: self.strategy,
            protection: self.protection.filter(|protection| !protection.is_empty()),
            seed: self.seed,
            execution_strategy: self.execution_strategy,
            extractor: self.extractor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::network::Edge;

    #[rstest]
    #[case::empty(Vec::new(), 1, AttackError::EmptyGrid)]
    #[case::negative(vec![0.0, -0.1], 1, AttackError::FractionOutOfRange { fraction: -0.1 })]
    #[case::above_one(vec![1.5], 1, AttackError::FractionOutOfRange { fraction: 1.5 })]
    #[case::zero_trials(vec![0.5], 0, AttackError::ZeroTrials)]
    fn build_rejects_invalid_configuration(
        #[case] fractions: Vec<f64>,
        #[case] trials: usize,
        #[case] expected: AttackError,
    ) {
        let err = AttackSimulatorBuilder::new()
            .with_fractions(fractions)
            .with_trials(trials)
            .build()
            .expect_err("configuration must be rejected");
        assert_eq!(err, expected);
    }

    #[test]
    fn non_finite_fraction_is_rejected() {
        let err = AttackSimulatorBuilder::new()
            .with_fractions([f64::NAN])
            .build()
            .expect_err("NaN must be rejected");
        assert!(matches!(err, AttackError::FractionOutOfRange { .. }));
    }

    #[test]
    fn build_keeps_configuration() {
        let simulator = AttackSimulatorBuilder::new()
            .with_fractions([0.0, 0.5])
            .with_trials(3)
            .with_seed(7)
            .with_execution_strategy(ExecutionStrategy::Sequential)
            .build()
            .expect("configuration is valid");
        assert_eq!(simulator.fractions(), &[0.0, 0.5]);
        assert_eq!(simulator.trials().get(), 3);
        assert_eq!(simulator.seed(), 7);
        assert_eq!(simulator.execution_strategy(), ExecutionStrategy::Sequential);
        assert!(simulator.protection().is_none());
    }

    #[rstest]
    #[case::empty(Protection::default(), false)]
    #[case::no_bridges(Protection::from_bridges(Vec::new()), false)]
    #[case::one_bridge(Protection::from_bridges([Edge::new(2, 3)]), true)]
    fn build_drops_empty_protection(#[case] protection: Protection, #[case] kept: bool) {
        let simulator = AttackSimulatorBuilder::new()
            .with_protection(protection)
            .build()
            .expect("configuration is valid");
        assert_eq!(simulator.protection().is_some(), kept);
    }
}
