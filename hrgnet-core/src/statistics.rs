//! Reduction of per-trial samples into per-fraction statistics.

use crate::error::AttackError;

/// Mean and population standard deviation of the rescaled giant-component
/// size at one removal fraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackRecord {
    fraction: f64,
    mean: f64,
    std_dev: f64,
}

impl AttackRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(fraction: f64, mean: f64, std_dev: f64) -> Self {
        Self {
            fraction,
            mean,
            std_dev,
        }
    }

    /// Returns the removal fraction `p`.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Returns the mean rescaled giant-component size.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the population standard deviation of the rescaled size.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

/// Rescaled giant-component sizes collected at one removal fraction.
#[derive(Clone, Debug, PartialEq)]
pub struct FractionSamples {
    fraction: f64,
    samples: Vec<f64>,
}

impl FractionSamples {
    /// Groups `samples` under `fraction`.
    #[must_use]
    pub const fn new(fraction: f64, samples: Vec<f64>) -> Self {
        Self { fraction, samples }
    }

    /// Returns the removal fraction.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Returns the collected samples in trial order.
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

/// Reduces samples to one [`AttackRecord`] per fraction, ordered by ascending
/// fraction. Entries with equal fractions keep their input order.
///
/// # Errors
/// Returns [`AttackError::EmptySamples`] when a fraction carries no samples.
///
/// # Examples
/// ```
/// use hrgnet_core::{FractionSamples, summarize};
///
/// let records = summarize(vec![
///     FractionSamples::new(0.5, vec![0.2, 0.4]),
///     FractionSamples::new(0.0, vec![1.0, 1.0]),
/// ])?;
/// assert_eq!(records[0].fraction(), 0.0);
/// assert_eq!(records[0].std_dev(), 0.0);
/// assert!((records[1].mean() - 0.3).abs() < 1e-12);
/// assert!((records[1].std_dev() - 0.1).abs() < 1e-12);
/// # Ok::<(), hrgnet_core::AttackError>(())
/// ```
pub fn summarize(mut samples: Vec<FractionSamples>) -> Result<Vec<AttackRecord>, AttackError> {
    samples.sort_by(|left, right| left.fraction.total_cmp(&right.fraction));
    samples
        .iter()
        .map(|group| {
            let (mean, std_dev) = mean_and_std(&group.samples).ok_or(AttackError::EmptySamples {
                fraction: group.fraction,
            })?;
            Ok(AttackRecord::new(group.fraction, mean, std_dev))
        })
        .collect()
}

#[expect(
    clippy::cast_precision_loss,
    reason = "trial counts stay far below 2^52"
)]
fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    Some((mean, variance.sqrt()))
}

/// Returns `steps` evenly spaced values from `start` to `stop`, both ends
/// included.
///
/// # Examples
/// ```
/// use hrgnet_core::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(0.3, 0.9, 1), vec![0.3]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "grid sizes stay far below 2^52"
)]
#[must_use]
pub fn linspace(start: f64, stop: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (steps - 1) as f64;
            (0..steps)
                .map(|step| {
                    if step == steps - 1 {
                        stop
                    } else {
                        start + (stop - start) * step as f64 / last
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn orders_by_fraction_stably() {
        let records = summarize(vec![
            FractionSamples::new(0.9, vec![0.1]),
            FractionSamples::new(0.1, vec![0.8]),
            FractionSamples::new(0.1, vec![0.6]),
        ])
        .expect("all fractions carry samples");
        let means: Vec<f64> = records.iter().map(AttackRecord::mean).collect();
        assert_eq!(means, vec![0.8, 0.6, 0.1]);
    }

    #[test]
    fn empty_group_is_rejected() {
        let err = summarize(vec![
            FractionSamples::new(0.0, vec![1.0]),
            FractionSamples::new(0.4, Vec::new()),
        ])
        .expect_err("empty group must fail");
        assert_eq!(err, AttackError::EmptySamples { fraction: 0.4 });
    }

    #[rstest]
    #[case(&[0.5], 0.5, 0.0)]
    #[case(&[0.0, 1.0], 0.5, 0.5)]
    #[case(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0, 2.0)]
    fn population_standard_deviation(#[case] values: &[f64], #[case] mean: f64, #[case] std_dev: f64) {
        let (actual_mean, actual_std) = mean_and_std(values).expect("non-empty");
        assert!((actual_mean - mean).abs() < 1e-12);
        assert!((actual_std - std_dev).abs() < 1e-12);
    }

    #[test]
    fn default_grid_hits_tenths() {
        let grid = linspace(0.0, 1.0, 11);
        assert_eq!(grid.len(), 11);
        assert_eq!(grid.first().copied(), Some(0.0));
        assert_eq!(grid.last().copied(), Some(1.0));
        assert!((grid[3] - 0.3).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn linspace_is_monotone_with_exact_ends(
            start in 0.0_f64..0.5,
            stop in 0.5_f64..1.0,
            steps in 2_usize..64,
        ) {
            let grid = linspace(start, stop, steps);
            prop_assert_eq!(grid.len(), steps);
            prop_assert_eq!(grid[0], start);
            prop_assert_eq!(grid[steps - 1], stop);
            prop_assert!(grid.windows(2).all(|pair| pair[0] <= pair[1]));
        }

        #[test]
        fn std_dev_is_non_negative(values in proptest::collection::vec(0.0_f64..1.0, 1..32)) {
            let (mean, std_dev) = mean_and_std(&values).expect("non-empty");
            prop_assert!((0.0..=1.0).contains(&mean) || (mean - 1.0).abs() < 1e-12);
            prop_assert!(std_dev >= 0.0);
        }
    }
}
