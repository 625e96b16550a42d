//! Random-graph generators.
//!
//! [`LeafGraphProvider`] is the seam the synthesizer uses to populate leaf
//! communities. [`ErdosRenyi`] implements it with a geometric-skip `G(n, p)`
//! sampler; [`barabasi_albert`] builds preferential-attachment base graphs for
//! attack sweeps.

use std::collections::BTreeSet;

use rand::{Rng, seq::SliceRandom};

use crate::{
    error::GeneratorError,
    network::{Edge, Network},
};

/// Graph over local vertex ids `0..vertex_count`.
///
/// # Examples
/// ```
/// use hrgnet_core::LocalGraph;
///
/// let graph = LocalGraph::new(3, vec![(0, 1), (1, 2)])?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.edges(), &[(0, 1), (1, 2)]);
/// assert!(LocalGraph::new(2, vec![(0, 2)]).is_err());
/// # Ok::<(), hrgnet_core::GeneratorError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalGraph {
    vertex_count: usize,
    edges: Vec<(usize, usize)>,
}

impl LocalGraph {
    /// Creates a graph, checking that every endpoint lies in `0..vertex_count`.
    ///
    /// # Errors
    /// Returns [`GeneratorError::VertexOutOfRange`] for an out-of-range endpoint.
    pub fn new(vertex_count: usize, edges: Vec<(usize, usize)>) -> Result<Self, GeneratorError> {
        if let Some(&vertex) = edges
            .iter()
            .flat_map(|(a, b)| [a, b])
            .find(|vertex| **vertex >= vertex_count)
        {
            return Err(GeneratorError::VertexOutOfRange {
                vertex,
                vertex_count,
            });
        }
        Ok(Self {
            vertex_count,
            edges,
        })
    }

    /// Returns the number of local vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the local edge list.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Shifts every local id by `offset`, yielding global edges.
    pub fn edges_offset(&self, offset: usize) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .map(move |&(a, b)| Edge::new(offset + a, offset + b))
    }

    /// Converts the graph into a [`Network`] using the local ids as vertex ids.
    #[must_use]
    pub fn into_network(self) -> Network {
        Network::from_edges(self.vertex_count, self.edges_offset(0))
    }
}

/// Produces the random subgraph of one leaf community.
pub trait LeafGraphProvider {
    /// Generates a graph over `size` local vertices at edge density
    /// `probability`, drawing randomness from `rng`.
    ///
    /// # Errors
    /// Implementations return [`GeneratorError`] when the parameters are
    /// unusable.
    fn generate<R: Rng + ?Sized>(
        &self,
        size: usize,
        probability: f64,
        rng: &mut R,
    ) -> Result<LocalGraph, GeneratorError>;
}

/// [`LeafGraphProvider`] backed by [`erdos_renyi`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ErdosRenyi;

impl LeafGraphProvider for ErdosRenyi {
    fn generate<R: Rng + ?Sized>(
        &self,
        size: usize,
        probability: f64,
        rng: &mut R,
    ) -> Result<LocalGraph, GeneratorError> {
        erdos_renyi(size, probability, rng)
    }
}

/// Samples an Erdős–Rényi `G(n, p)` graph.
///
/// Uses the Batagelj–Brandes geometric skip, so the cost is proportional to
/// `n + m` rather than `n²`.
///
/// # Errors
/// Returns [`GeneratorError::InvalidProbability`] when `probability` is not a
/// finite number in `[0, 1]`.
///
/// # Examples
/// ```
/// use hrgnet_core::erdos_renyi;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let complete = erdos_renyi(5, 1.0, &mut rng)?;
/// assert_eq!(complete.edges().len(), 10);
/// let empty = erdos_renyi(5, 0.0, &mut rng)?;
/// assert!(empty.edges().is_empty());
/// # Ok::<(), hrgnet_core::GeneratorError>(())
/// ```
pub fn erdos_renyi<R: Rng + ?Sized>(
    n: usize,
    probability: f64,
    rng: &mut R,
) -> Result<LocalGraph, GeneratorError> {
    validate_probability(probability)?;
    if probability <= 0.0 || n < 2 {
        return LocalGraph::new(n, Vec::new());
    }
    if probability >= 1.0 {
        let edges = (0..n)
            .flat_map(|v| (0..v).map(move |w| (v, w)))
            .collect();
        return LocalGraph::new(n, edges);
    }

    let log_q = (1.0 - probability).ln();
    let mut edges = Vec::new();
    let mut v = 1_usize;
    let mut w = 0_usize;
    let mut first = true;
    while v < n {
        let draw: f64 = rng.gen_range(0.0..1.0);
        let skip = ((1.0 - draw).ln() / log_q).floor() as usize;
        w = if first { skip } else { w.saturating_add(1).saturating_add(skip) };
        first = false;
        while w >= v && v < n {
            w -= v;
            v += 1;
        }
        if v < n {
            edges.push((v, w));
        }
    }
    LocalGraph::new(n, edges)
}

/// Grows a Barabási–Albert preferential-attachment graph.
///
/// Starts from a star on `attachments + 1` vertices; every later vertex links
/// to `attachments` distinct existing vertices chosen proportionally to
/// degree.
///
/// # Errors
/// Returns [`GeneratorError::InvalidAttachment`] unless
/// `1 <= attachments < n`.
///
/// # Examples
/// ```
/// use hrgnet_core::barabasi_albert;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = barabasi_albert(50, 3, &mut SmallRng::seed_from_u64(1))?;
/// assert_eq!(graph.vertex_count(), 50);
/// assert_eq!(graph.edges().len(), 3 + (50 - 4) * 3);
/// # Ok::<(), hrgnet_core::GeneratorError>(())
/// ```
pub fn barabasi_albert<R: Rng + ?Sized>(
    n: usize,
    attachments: usize,
    rng: &mut R,
) -> Result<LocalGraph, GeneratorError> {
    if attachments == 0 || attachments >= n {
        return Err(GeneratorError::InvalidAttachment {
            attachments,
            nodes: n,
        });
    }

    let mut edges: Vec<(usize, usize)> = (1..=attachments).map(|leaf| (0, leaf)).collect();
    let mut endpoints: Vec<usize> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();

    for source in (attachments + 1)..n {
        let mut targets = BTreeSet::new();
        while targets.len() < attachments {
            if let Some(&target) = endpoints.choose(rng) {
                targets.insert(target);
            }
        }
        for target in targets {
            edges.push((source, target));
            endpoints.push(source);
            endpoints.push(target);
        }
    }
    LocalGraph::new(n, edges)
}

fn validate_probability(probability: f64) -> Result<(), GeneratorError> {
    if probability.is_finite() && (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidProbability { probability })
    }
}
