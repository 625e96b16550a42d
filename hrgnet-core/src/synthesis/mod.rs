//! Hierarchical random-graph synthesis.
//!
//! Every leaf of a [`Dendrogram`] seeds a community whose internal edges come
//! from a [`LeafGraphProvider`]. Communities are then folded bottom-up: two
//! active communities whose remaining dendrogram neighbourhoods are the same
//! single parent merge into a community keyed by that parent, wired together
//! by freshly sampled bridge edges. Synthesis ends when one community is left.

mod bridge;

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use rand::Rng;
use tracing::{Span, debug, field, info, instrument};

use crate::{
    dendrogram::{Dendrogram, NodeKind},
    error::{GeneratorError, SynthesisError},
    generators::LeafGraphProvider,
    network::{Edge, Network, VertexId},
};

/// Output of [`synthesize`]: the composite network and its bridge audit trail.
#[derive(Clone, Debug)]
pub struct SynthesizedNetwork {
    network: Network,
    bridge_edges: Vec<Edge>,
}

impl SynthesizedNetwork {
    /// Returns the synthesized network.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Returns every bridge edge in merge order.
    #[must_use]
    pub fn bridge_edges(&self) -> &[Edge] {
        &self.bridge_edges
    }

    /// Splits the result into the network and the bridge list.
    #[must_use]
    pub fn into_parts(self) -> (Network, Vec<Edge>) {
        (self.network, self.bridge_edges)
    }
}

#[derive(Debug)]
struct Community {
    node: NodeIndex,
    vertices: Vec<VertexId>,
    edges: Vec<Edge>,
}

#[derive(Debug)]
enum Slot {
    Active(Community),
    Merged,
}

impl Slot {
    fn active(&self) -> Option<&Community> {
        match self {
            Self::Active(community) => Some(community),
            Self::Merged => None,
        }
    }

    fn take(&mut self) -> Option<Community> {
        match std::mem::replace(self, Self::Merged) {
            Self::Active(community) => Some(community),
            Self::Merged => None,
        }
    }
}

/// Synthesizes a network from `dendrogram`.
///
/// Vertices are allocated in contiguous blocks, one per leaf, in leaf order.
/// All randomness, for leaf graphs and bridges alike, is drawn from `rng`, so
/// a seeded generator reproduces the same network.
///
/// # Errors
/// Returns [`SynthesisError::LeafProvider`] when the provider fails or returns
/// a graph of the wrong size, and [`SynthesisError::MalformedDendrogram`] when
/// a merge round makes no progress while several communities remain.
///
/// # Examples
/// ```
/// use hrgnet_core::{Dendrogram, ErdosRenyi, synthesize};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let dendrogram: Dendrogram = "R A\nR B\n#\nR 0.5\nA 0.6\nB 0.6\n#\nA 4\nB 4\n".parse()?;
/// let result = synthesize(&dendrogram, &ErdosRenyi, &mut SmallRng::seed_from_u64(42))?;
/// assert_eq!(result.network().vertex_count(), 8);
/// assert_eq!(result.bridge_edges().len(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "core.synthesize",
    err,
    skip(dendrogram, provider, rng),
    fields(
        nodes = dendrogram.node_count(),
        total_size = dendrogram.total_size(),
        rounds = field::Empty,
        bridges = field::Empty,
    ),
)]
pub fn synthesize<P, R>(
    dendrogram: &Dendrogram,
    provider: &P,
    rng: &mut R,
) -> Result<SynthesizedNetwork, SynthesisError>
where
    P: LeafGraphProvider,
    R: Rng + ?Sized,
{
    let (mut slots, vertex_count) = instantiate_leaves(dendrogram, provider, rng)?;
    let mut merged: HashSet<NodeIndex> = HashSet::new();
    let mut bridge_edges = Vec::new();
    let mut rounds = 0_usize;

    loop {
        let active: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(slot, state)| state.active().map(|_| slot))
            .collect();
        if active.len() <= 1 {
            break;
        }
        rounds += 1;

        let mut merges = 0_usize;
        for (position, &left) in active.iter().enumerate() {
            for &right in &active[position + 1..] {
                let Some(parent) = common_parent(dendrogram, &slots, left, right, &merged) else {
                    continue;
                };
                let (Some(first), Some(second)) = (slots[left].take(), slots[right].take()) else {
                    continue;
                };
                let (first_node, second_node, community) =
                    merge(dendrogram, parent, first, second, &mut bridge_edges, rng);
                merged.extend([first_node, second_node]);
                slots.push(Slot::Active(community));
                merges += 1;
            }
        }

        debug!(round = rounds, merges, active = active.len(), "merge round complete");
        if merges == 0 {
            let remaining = active
                .iter()
                .filter_map(|&slot| slots[slot].active())
                .map(|community| dendrogram.node_at(community.node).id().to_owned())
                .collect();
            return Err(SynthesisError::MalformedDendrogram { remaining });
        }
    }

    let edges = slots
        .into_iter()
        .find_map(|slot| match slot {
            Slot::Active(community) => Some(community.edges),
            Slot::Merged => None,
        })
        .unwrap_or_default();
    let network = Network::from_edges(vertex_count, edges);

    let span = Span::current();
    span.record("rounds", rounds);
    span.record("bridges", bridge_edges.len());
    info!(
        vertices = network.vertex_count(),
        edges = network.edge_count(),
        bridges = bridge_edges.len(),
        "synthesis complete"
    );
    Ok(SynthesizedNetwork {
        network,
        bridge_edges,
    })
}

fn instantiate_leaves<P, R>(
    dendrogram: &Dendrogram,
    provider: &P,
    rng: &mut R,
) -> Result<(Vec<Slot>, usize), SynthesisError>
where
    P: LeafGraphProvider,
    R: Rng + ?Sized,
{
    let mut slots = Vec::with_capacity(dendrogram.node_count());
    let mut next_vertex = 0_usize;
    for &ix in dendrogram.leaf_indices() {
        let node = dendrogram.node_at(ix);
        let NodeKind::Leaf { size, probability } = node.kind() else {
            continue;
        };
        let provider_error = |error: GeneratorError| SynthesisError::LeafProvider {
            node: node.id().to_owned(),
            error,
        };
        let local = provider
            .generate(size, probability, rng)
            .map_err(provider_error)?;
        if local.vertex_count() != size {
            return Err(provider_error(GeneratorError::SizeMismatch {
                expected: size,
                actual: local.vertex_count(),
            }));
        }

        let offset = next_vertex;
        next_vertex += size;
        slots.push(Slot::Active(Community {
            node: ix,
            vertices: (offset..next_vertex).collect(),
            edges: local.edges_offset(offset).collect(),
        }));
    }
    Ok((slots, next_vertex))
}

/// Returns the shared parent when both communities have the same single
/// remaining neighbour.
fn common_parent(
    dendrogram: &Dendrogram,
    slots: &[Slot],
    left: usize,
    right: usize,
    merged: &HashSet<NodeIndex>,
) -> Option<NodeIndex> {
    let left = open_neighbors(dendrogram, slots[left].active()?.node, merged);
    let right = open_neighbors(dendrogram, slots[right].active()?.node, merged);
    match (left.as_slice(), right.as_slice()) {
        ([a], [b]) if a == b => Some(*a),
        _ => None,
    }
}

fn open_neighbors(
    dendrogram: &Dendrogram,
    node: NodeIndex,
    merged: &HashSet<NodeIndex>,
) -> Vec<NodeIndex> {
    let mut open: Vec<NodeIndex> = dendrogram
        .neighbor_indices(node)
        .filter(|neighbor| !merged.contains(neighbor))
        .collect();
    open.sort_unstable();
    open.dedup();
    open
}

/// Folds `first` and `second` into a community keyed by `parent`, returning
/// the two consumed dendrogram nodes alongside it.
fn merge<R: Rng + ?Sized>(
    dendrogram: &Dendrogram,
    parent: NodeIndex,
    first: Community,
    second: Community,
    bridge_edges: &mut Vec<Edge>,
    rng: &mut R,
) -> (NodeIndex, NodeIndex, Community) {
    let probability = dendrogram.node_at(parent).kind().probability();
    let bridges = bridge::sample_bridge_edges(&first.vertices, &second.vertices, probability, rng);
    bridge_edges.extend_from_slice(&bridges);

    let Community {
        node: first_node,
        mut vertices,
        mut edges,
    } = first;
    vertices.extend(second.vertices);
    vertices.sort_unstable();
    edges.extend(second.edges);
    edges.extend(bridges);

    (
        first_node,
        second.node,
        Community {
            node: parent,
            vertices,
            edges,
        },
    )
}
