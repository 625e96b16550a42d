//! Largest-connected-component extraction.
//!
//! The attack engine only needs the size of the giant component after each
//! removal, so extraction sits behind [`ComponentExtractor`]. The default
//! [`UnionFindExtractor`] folds every surviving edge into a disjoint-set
//! forest and reads the largest root size.

use crate::network::Network;

/// Measures the giant connected component of a [`Network`].
///
/// Any `Fn(&Network) -> usize` closure implements the trait, which keeps tests
/// and alternative graph libraries cheap to plug in.
///
/// # Examples
/// ```
/// use hrgnet_core::{ComponentExtractor, Edge, Network, UnionFindExtractor};
///
/// let network = Network::from_edges(5, [Edge::new(0, 1), Edge::new(1, 2), Edge::new(3, 4)]);
/// assert_eq!(UnionFindExtractor.largest_component_size(&network), 3);
///
/// let constant = |_: &Network| 1;
/// assert_eq!(constant.largest_component_size(&network), 1);
/// ```
pub trait ComponentExtractor {
    /// Returns the vertex count of the largest connected component, or zero
    /// for an empty network.
    fn largest_component_size(&self, network: &Network) -> usize;
}

impl<F> ComponentExtractor for F
where
    F: Fn(&Network) -> usize,
{
    fn largest_component_size(&self, network: &Network) -> usize {
        self(network)
    }
}

/// Union-find based [`ComponentExtractor`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnionFindExtractor;

impl ComponentExtractor for UnionFindExtractor {
    fn largest_component_size(&self, network: &Network) -> usize {
        if network.vertex_count() == 0 {
            return 0;
        }
        let mut sets = DisjointSet::new(network.vertex_bound());
        for edge in network.edges() {
            sets.union(edge.source(), edge.target());
        }
        network
            .vertices()
            .map(|vertex| {
                let root = sets.find(vertex);
                sets.size[root]
            })
            .max()
            .unwrap_or(0)
    }
}

/// Disjoint-set forest with union by size and path compression.
///
/// Slots for removed vertices stay as singletons and are never visited by
/// the extractor.
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        if self.size[left] < self.size[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        self.size[left] += self.size[right];
        left
    }
}
