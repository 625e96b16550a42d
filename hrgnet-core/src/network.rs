//! Undirected simple graph over global vertex identifiers.
//!
//! Vertices are addressed by the contiguous ids handed out during synthesis.
//! The backing `StableUnGraph` keeps indices stable across removals, so a
//! vertex keeps its id for the lifetime of every copy of the network.

use petgraph::{
    stable_graph::{NodeIndex, StableUnGraph},
    visit::{EdgeRef, IntoEdgeReferences, NodeIndexable},
};

/// Global vertex identifier.
pub type VertexId = usize;

/// Undirected edge with endpoints normalised so `source <= target`.
///
/// # Examples
/// ```
/// use hrgnet_core::Edge;
///
/// let edge = Edge::new(7, 3);
/// assert_eq!((edge.source(), edge.target()), (3, 7));
/// assert_eq!(edge, Edge::new(3, 7));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
}

impl Edge {
    /// Creates an edge between `a` and `b`.
    #[must_use]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self {
            source: a.min(b),
            target: a.max(b),
        }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    pub const fn source(&self) -> VertexId {
        self.source
    }

    /// Returns the larger endpoint.
    #[must_use]
    pub const fn target(&self) -> VertexId {
        self.target
    }

    /// Returns whether `vertex` is one of the endpoints.
    #[must_use]
    pub const fn touches(&self, vertex: VertexId) -> bool {
        self.source == vertex || self.target == vertex
    }
}

/// Undirected simple graph without self loops or parallel edges.
///
/// # Examples
/// ```
/// use hrgnet_core::{Edge, Network};
///
/// let mut network = Network::from_edges(4, [Edge::new(0, 1), Edge::new(1, 2)]);
/// assert_eq!(network.vertex_count(), 4);
/// assert_eq!(network.edge_count(), 2);
/// assert_eq!(network.degree(1), 2);
///
/// assert!(network.remove_vertex(1));
/// assert_eq!(network.edge_count(), 0);
/// assert_eq!(network.vertices().collect::<Vec<_>>(), vec![0, 2, 3]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Network {
    graph: StableUnGraph<(), ()>,
}

impl Network {
    /// Creates a network with vertices `0..vertex_count` and no edges.
    #[must_use]
    pub fn with_vertices(vertex_count: usize) -> Self {
        let mut graph = StableUnGraph::with_capacity(vertex_count, 0);
        for _ in 0..vertex_count {
            graph.add_node(());
        }
        Self { graph }
    }

    /// Creates a network with vertices `0..vertex_count` and the given edges.
    ///
    /// Self loops, repeated edges, and edges touching vertices outside the
    /// range are skipped.
    #[must_use]
    pub fn from_edges(vertex_count: usize, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut network = Self::with_vertices(vertex_count);
        for edge in edges {
            network.add_edge(edge);
        }
        network
    }

    /// Adds `edge`, returning `false` when it is a self loop, already present,
    /// or touches a missing vertex.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if edge.source == edge.target
            || !self.contains_vertex(edge.source)
            || !self.contains_vertex(edge.target)
        {
            return false;
        }
        let (a, b) = (NodeIndex::new(edge.source), NodeIndex::new(edge.target));
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Returns the number of vertices still present.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges still present.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns one past the largest vertex id ever allocated.
    #[must_use]
    pub fn vertex_bound(&self) -> usize {
        self.graph.node_bound()
    }

    /// Returns whether `vertex` is present.
    #[must_use]
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.graph.contains_node(NodeIndex::new(vertex))
    }

    /// Returns whether `edge` is present.
    #[must_use]
    pub fn contains_edge(&self, edge: Edge) -> bool {
        self.graph
            .find_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target))
            .is_some()
    }

    /// Returns the degree of `vertex`, or zero when it is absent.
    #[must_use]
    pub fn degree(&self, vertex: VertexId) -> usize {
        if !self.contains_vertex(vertex) {
            return 0;
        }
        self.graph.edges(NodeIndex::new(vertex)).count()
    }

    /// Iterates over present vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.node_indices().map(NodeIndex::index)
    }

    /// Iterates over the neighbours of `vertex`.
    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let index = NodeIndex::new(vertex);
        self.contains_vertex(vertex)
            .then(|| self.graph.neighbors(index).map(NodeIndex::index))
            .into_iter()
            .flatten()
    }

    /// Returns every present edge in ascending order.
    #[must_use]
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_references()
            .map(|edge| Edge::new(edge.source().index(), edge.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Removes `vertex` and its incident edges, returning whether it existed.
    pub fn remove_vertex(&mut self, vertex: VertexId) -> bool {
        self.graph.remove_node(NodeIndex::new(vertex)).is_some()
    }

    /// Removes `edge`, returning whether it existed.
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        let found = self
            .graph
            .find_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target));
        match found {
            Some(index) => self.graph.remove_edge(index).is_some(),
            None => false,
        }
    }
}
