//! Bridge protection sets excluded from victim selection.

use std::collections::HashSet;

use crate::network::{Edge, VertexId};

/// Edges and vertices that attacks must never remove.
///
/// Built from synthesis bridge edges: each bridge is protected together with
/// both of its endpoints.
///
/// # Examples
/// ```
/// use hrgnet_core::{Edge, Protection};
///
/// let protection = Protection::from_bridges([Edge::new(0, 5), Edge::new(1, 5)]);
/// assert_eq!(protection.edges().len(), 2);
/// assert_eq!(protection.vertices().len(), 3);
/// assert!(protection.protects_vertex(5));
/// assert!(!protection.protects_edge(Edge::new(0, 1)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Protection {
    edges: HashSet<Edge>,
    vertices: HashSet<VertexId>,
}

impl Protection {
    /// Protects every bridge and its endpoints.
    #[must_use]
    pub fn from_bridges(bridges: impl IntoIterator<Item = Edge>) -> Self {
        let edges: HashSet<Edge> = bridges.into_iter().collect();
        let vertices = edges
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .collect();
        Self { edges, vertices }
    }

    /// Returns the protected edges.
    #[must_use]
    pub fn edges(&self) -> &HashSet<Edge> {
        &self.edges
    }

    /// Returns the protected vertices.
    #[must_use]
    pub fn vertices(&self) -> &HashSet<VertexId> {
        &self.vertices
    }

    /// Returns whether `vertex` is protected.
    #[must_use]
    pub fn protects_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Returns whether `edge` is protected.
    #[must_use]
    pub fn protects_edge(&self, edge: Edge) -> bool {
        self.edges.contains(&edge)
    }

    /// Returns whether nothing is protected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
