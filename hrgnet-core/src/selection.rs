//! Degree-based target selection for targeted attacks.

use std::{cmp::Reverse, collections::HashSet};

use crate::network::{Network, VertexId};

/// Ranks vertices by degree, highest first, with ties broken by ascending id.
///
/// Vertices in `exclude` are dropped from the ranking.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
///
/// use hrgnet_core::{Edge, Network, rank_by_degree};
///
/// let star = Network::from_edges(4, [Edge::new(0, 3), Edge::new(1, 3), Edge::new(2, 3)]);
/// assert_eq!(rank_by_degree(&star, &HashSet::new()), vec![3, 0, 1, 2]);
/// assert_eq!(rank_by_degree(&star, &HashSet::from([3])), vec![0, 1, 2]);
/// ```
#[must_use]
pub fn rank_by_degree<S: std::hash::BuildHasher>(
    network: &Network,
    exclude: &HashSet<VertexId, S>,
) -> Vec<VertexId> {
    let mut ranked: Vec<(usize, VertexId)> = network
        .vertices()
        .filter(|vertex| !exclude.contains(vertex))
        .map(|vertex| (network.degree(vertex), vertex))
        .collect();
    ranked.sort_unstable_by_key(|&(degree, vertex)| (Reverse(degree), vertex));
    ranked.into_iter().map(|(_, vertex)| vertex).collect()
}

/// Returns the first [`removal_count`]`(vertex_count, fraction)` vertices of
/// [`rank_by_degree`], or the whole ranking when it is shorter.
#[must_use]
pub fn top_fraction<S: std::hash::BuildHasher>(
    network: &Network,
    fraction: f64,
    exclude: &HashSet<VertexId, S>,
) -> Vec<VertexId> {
    let mut ranked = rank_by_degree(network, exclude);
    ranked.truncate(removal_count(network.vertex_count(), fraction));
    ranked
}

/// Returns `floor(population * fraction)`.
///
/// # Examples
/// ```
/// use hrgnet_core::removal_count;
///
/// assert_eq!(removal_count(10, 0.25), 2);
/// assert_eq!(removal_count(10, 1.0), 10);
/// assert_eq!(removal_count(0, 0.5), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "fractions lie in [0, 1] so the product stays within 0..=population"
)]
#[must_use]
pub fn removal_count(population: usize, fraction: f64) -> usize {
    (population as f64 * fraction).floor() as usize
}
