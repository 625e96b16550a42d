//! Balanced synthetic dendrograms for benchmarking.
//!
//! Nodes are numbered heap style: the root is `n1` and node `nK` has children
//! `n{2K}` and `n{2K+1}`. Probabilities decay geometrically towards the root
//! so that deeper merges stay sparse.

use hrgnet_core::{Dendrogram, DendrogramTables};

use crate::error::BenchSetupError;

/// Errors that may occur during synthetic dendrogram generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested leaf size was zero.
    #[error("leaf size must be greater than zero")]
    ZeroLeafSize,
    /// The requested depth would overflow the node numbering.
    #[error("depth {depth} exceeds the supported maximum of {max}")]
    DepthTooLarge {
        /// Requested depth.
        depth: u32,
        /// Largest supported depth.
        max: u32,
    },
}

const MAX_DEPTH: u32 = 20;

/// Configuration for a balanced binary dendrogram.
#[derive(Clone, Debug)]
pub struct BalancedConfig {
    /// Number of merge levels; the tree has `2^depth` leaves.
    pub depth: u32,
    /// Vertices per leaf community.
    pub leaf_size: usize,
    /// Edge probability inside each leaf.
    pub leaf_probability: f64,
    /// Bridge probability at the deepest internal level.
    pub merge_probability: f64,
}

impl BalancedConfig {
    /// Number of leaves the configuration produces.
    #[must_use]
    pub const fn leaf_count(&self) -> usize {
        1 << self.depth
    }

    /// Builds the raw tables without validating them.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] if the leaf size is zero or the depth is
    /// too large.
    pub fn tables(&self) -> Result<DendrogramTables, SyntheticError> {
        if self.leaf_size == 0 {
            return Err(SyntheticError::ZeroLeafSize);
        }
        if self.depth > MAX_DEPTH {
            return Err(SyntheticError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }

        let mut tables = DendrogramTables::default();
        let first_leaf = 1_usize << self.depth;
        for node in 1..first_leaf {
            let level = node.ilog2();
            let probability = self.merge_probability / f64::from(1_u32 << (self.depth - 1 - level));
            tables.probabilities.push((label(node), probability));
            for child in [2 * node, 2 * node + 1] {
                tables.edges.push((label(node), label(child)));
            }
        }
        for leaf in first_leaf..2 * first_leaf {
            tables
                .probabilities
                .push((label(leaf), self.leaf_probability));
            tables.sizes.push((label(leaf), self.leaf_size));
        }
        Ok(tables)
    }
}

fn label(node: usize) -> String {
    format!("n{node}")
}

/// Builds a validated balanced dendrogram.
///
/// # Errors
/// Returns [`BenchSetupError`] if the configuration is rejected or the
/// tables fail validation.
///
/// # Examples
/// ```
/// use hrgnet_benches::source::{BalancedConfig, balanced_dendrogram};
///
/// let config = BalancedConfig {
///     depth: 2,
///     leaf_size: 10,
///     leaf_probability: 0.3,
///     merge_probability: 0.2,
/// };
/// let dendrogram = balanced_dendrogram(&config).expect("valid config");
/// assert_eq!(dendrogram.total_size(), 40);
/// assert_eq!(dendrogram.node_count(), 7);
/// ```
pub fn balanced_dendrogram(config: &BalancedConfig) -> Result<Dendrogram, BenchSetupError> {
    let tables = config.tables()?;
    Ok(Dendrogram::from_tables(tables)?)
}
