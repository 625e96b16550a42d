//! Probabilistic merge tree driving hierarchical random-graph synthesis.
//!
//! A [`Dendrogram`] is a rooted tree over string node identifiers. Leaves carry
//! a population size and an intra-community edge probability; internal nodes
//! carry the wiring probability used when their two children are merged. The
//! tree is validated once at load time and is immutable afterwards.
//!
//! Edge lines are undirected. The root is the sizeless node that is never
//! written on the right of an edge, falling back to the sizeless node with
//! the fewest neighbours and then to the earliest declared one.

mod parser;

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use petgraph::{
    Direction,
    algo::connected_components,
    graph::{DiGraph, NodeIndex},
    visit::DfsPostOrder,
};
use tracing::{Span, field, info, instrument};

use crate::error::{DendrogramError, StructureError};

const PROBABILITY_TABLE: &str = "probability";
const SIZE_TABLE: &str = "size";

/// Attributes of a dendrogram node, validated at load time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// Childless node that seeds a community.
    Leaf {
        /// Number of vertices in the community.
        size: usize,
        /// Intra-community edge probability.
        probability: f64,
    },
    /// Merge point joining its children.
    Internal {
        /// Probability used to size the bridge between the merged children.
        probability: f64,
    },
}

impl NodeKind {
    /// Returns the probability attached to the node.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        match *self {
            Self::Leaf { probability, .. } | Self::Internal { probability } => probability,
        }
    }

    /// Returns the leaf size, or `None` for internal nodes.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match *self {
            Self::Leaf { size, .. } => Some(size),
            Self::Internal { .. } => None,
        }
    }

    /// Returns whether the node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}

/// Named dendrogram node.
#[derive(Clone, Debug, PartialEq)]
pub struct DendrogramNode {
    id: String,
    kind: NodeKind,
}

impl DendrogramNode {
    /// Returns the node identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the validated node attributes.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// Raw tables decoded from a dendrogram source, before tree validation.
///
/// Entries keep their source order. Edges may be written in either direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DendrogramTables {
    /// Undirected tree edges, conventionally written parent first.
    pub edges: Vec<(String, String)>,
    /// Per-node probabilities.
    pub probabilities: Vec<(String, f64)>,
    /// Per-leaf population sizes.
    pub sizes: Vec<(String, usize)>,
}

/// Validated probabilistic merge tree.
///
/// # Examples
/// ```
/// use hrgnet_core::Dendrogram;
///
/// let dendrogram: Dendrogram = "\
/// ## tree
/// R A
/// R B
/// ## probabilities
/// R 0.5
/// A 0.6
/// B 0.6
/// ## sizes
/// A 4
/// B 4
/// "
/// .parse()?;
/// assert_eq!(dendrogram.total_size(), 8);
/// assert_eq!(dendrogram.root().id(), "R");
/// assert!((dendrogram.average_degree()? - 2.3).abs() < 1e-12);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Dendrogram {
    graph: DiGraph<DendrogramNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
    leaves: Vec<NodeIndex>,
    post_order: Vec<NodeIndex>,
}

impl Dendrogram {
    /// Loads a dendrogram from the file at `path`.
    ///
    /// # Errors
    /// Returns [`DendrogramError::Io`] when the file cannot be read and the
    /// format or structure variants when its contents are invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DendrogramError> {
        load_path(path.as_ref())
    }

    /// Parses a dendrogram from a buffered reader.
    ///
    /// # Errors
    /// Returns [`DendrogramError::Format`] for undecodable records,
    /// [`DendrogramError::Structure`] when the tables do not form a valid
    /// tree, and [`DendrogramError::Io`] when reading fails.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, DendrogramError> {
        let tables = parser::parse_tables(reader)?;
        Ok(Self::from_tables(tables)?)
    }

    /// Builds a dendrogram from decoded tables.
    ///
    /// With an empty edge list the tables must name exactly one node, which
    /// then becomes both root and sole leaf.
    ///
    /// # Errors
    /// Returns a [`StructureError`] describing the first violation found.
    ///
    /// # Examples
    /// ```
    /// use hrgnet_core::{Dendrogram, DendrogramTables, StructureError};
    ///
    /// let tables = DendrogramTables {
    ///     edges: Vec::new(),
    ///     probabilities: vec![("solo".into(), 0.2)],
    ///     sizes: vec![("solo".into(), 10)],
    /// };
    /// let dendrogram = Dendrogram::from_tables(tables)?;
    /// assert_eq!(dendrogram.leaves().count(), 1);
    ///
    /// let err = Dendrogram::from_tables(DendrogramTables::default()).unwrap_err();
    /// assert_eq!(err, StructureError::Empty);
    /// # Ok::<(), StructureError>(())
    /// ```
    pub fn from_tables(tables: DendrogramTables) -> Result<Self, StructureError> {
        let DendrogramTables {
            edges,
            probabilities,
            sizes,
        } = tables;

        let topology = if edges.is_empty() {
            Topology::from_tables(&probabilities, &sizes)
        } else {
            Topology::from_edges(&edges)?
        };
        let sized = topology.indices_of(&sizes);
        let root = topology.root(&sized)?;
        let topology = topology.rooted_at(root);

        let probabilities = collect_table(&topology.index, probabilities, PROBABILITY_TABLE)?;
        let sizes = collect_table(&topology.index, sizes, SIZE_TABLE)?;
        let kinds = topology
            .graph
            .node_indices()
            .map(|ix| node_kind(&topology.graph, ix, root, &probabilities, &sizes))
            .collect::<Result<Vec<_>, _>>()?;

        let Topology { graph, index } = topology;
        let graph = graph.map(
            |ix, id| DendrogramNode {
                id: id.clone(),
                kind: kinds[ix.index()],
            },
            |_, _| (),
        );

        let leaves = graph
            .node_indices()
            .filter(|&ix| graph[ix].kind.is_leaf())
            .collect();
        let mut post_order = Vec::with_capacity(graph.node_count());
        let mut dfs = DfsPostOrder::new(&graph, root);
        while let Some(ix) = dfs.next(&graph) {
            post_order.push(ix);
        }

        Ok(Self {
            graph,
            index,
            root,
            leaves,
            post_order,
        })
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &DendrogramNode {
        &self.graph[self.root]
    }

    /// Looks a node up by identifier.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DendrogramNode> {
        self.index.get(id).map(|&ix| &self.graph[ix])
    }

    /// Iterates over leaves in processing order, which is the order of first
    /// appearance in the edge list.
    pub fn leaves(&self) -> impl Iterator<Item = &DendrogramNode> + '_ {
        self.leaves.iter().map(|&ix| &self.graph[ix])
    }

    /// Iterates over the children of `id`; empty for leaves and unknown ids.
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.adjacent(id, |graph, ix| {
            graph.neighbors_directed(ix, Direction::Outgoing).collect()
        })
    }

    /// Iterates over every tree neighbour of `id`, parent included.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.adjacent(id, |graph, ix| graph.neighbors_undirected(ix).collect())
    }

    /// Returns the exact sum of leaf sizes.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.leaves().filter_map(|node| node.kind.size()).sum()
    }

    /// Computes the expected average degree of a synthesized network.
    ///
    /// Leaves contribute `prob * size * (size - 1) / 2` expected edges. Each
    /// internal node, visited leaves-to-root, resolves its size as the sum of
    /// its children's and contributes `prob * min(child sizes)`.
    ///
    /// # Errors
    /// Returns [`StructureError::ZeroPopulation`] when every leaf is empty and
    /// [`StructureError::Unresolved`] if a node's size cannot be derived.
    pub fn average_degree(&self) -> Result<f64, StructureError> {
        let total = self.total_size();
        if total == 0 {
            return Err(StructureError::ZeroPopulation);
        }

        let mut sizes: Vec<Option<usize>> = vec![None; self.graph.node_count()];
        let mut expected_edges = 0.0;
        for &ix in &self.post_order {
            let node = &self.graph[ix];
            match node.kind {
                NodeKind::Leaf { size, probability } => {
                    let size_f = size as f64;
                    expected_edges += probability * size_f * (size_f - 1.0).max(0.0) / 2.0;
                    sizes[ix.index()] = Some(size);
                }
                NodeKind::Internal { probability } => {
                    let children = self
                        .graph
                        .neighbors_directed(ix, Direction::Outgoing)
                        .map(|child| sizes[child.index()])
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| StructureError::Unresolved {
                            node: node.id.clone(),
                        })?;
                    let smallest = children.iter().copied().min().unwrap_or(0);
                    expected_edges += probability * smallest as f64;
                    sizes[ix.index()] = Some(children.iter().sum());
                }
            }
        }
        if sizes.iter().any(Option::is_none) {
            let node = self
                .graph
                .node_indices()
                .find(|ix| sizes[ix.index()].is_none())
                .map_or_else(String::new, |ix| self.graph[ix].id.clone());
            return Err(StructureError::Unresolved { node });
        }
        Ok(2.0 * expected_edges / total as f64)
    }

    pub(crate) fn leaf_indices(&self) -> &[NodeIndex] {
        &self.leaves
    }

    pub(crate) fn node_at(&self, ix: NodeIndex) -> &DendrogramNode {
        &self.graph[ix]
    }

    pub(crate) fn neighbor_indices(&self, ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_undirected(ix)
    }

    fn adjacent<'a>(
        &'a self,
        id: &str,
        select: impl FnOnce(&DiGraph<DendrogramNode, ()>, NodeIndex) -> Vec<NodeIndex>,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let mut found = self
            .index
            .get(id)
            .map(|&ix| select(&self.graph, ix))
            .unwrap_or_default();
        found.sort_unstable();
        found.into_iter().map(|ix| self.graph[ix].id.as_str())
    }
}

impl FromStr for Dendrogram {
    type Err = DendrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

#[instrument(
    name = "core.dendrogram.load",
    err,
    skip(path),
    fields(path = %path.display(), nodes = field::Empty, leaves = field::Empty),
)]
fn load_path(path: &Path) -> Result<Dendrogram, DendrogramError> {
    let file = File::open(path).map_err(|source| DendrogramError::Io { source })?;
    let dendrogram = Dendrogram::parse(BufReader::new(file))?;
    let span = Span::current();
    span.record("nodes", dendrogram.node_count());
    span.record("leaves", dendrogram.leaves.len());
    info!(
        nodes = dendrogram.node_count(),
        leaves = dendrogram.leaves.len(),
        "dendrogram loaded"
    );
    Ok(dendrogram)
}

/// Tree shape keyed by node identifier, before attributes are attached.
///
/// Edges keep their written direction until [`Topology::rooted_at`] orients
/// them away from the root.
struct Topology {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl Topology {
    fn from_edges(edges: &[(String, String)]) -> Result<Self, StructureError> {
        let mut topology = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        for (left, right) in edges {
            if left == right {
                return Err(StructureError::SelfLoop { node: left.clone() });
            }
            let source = topology.intern(left);
            let target = topology.intern(right);
            if topology.graph.find_edge(source, target).is_some()
                || topology.graph.find_edge(target, source).is_some()
            {
                return Err(StructureError::DuplicateEdge {
                    source_node: left.clone(),
                    target_node: right.clone(),
                });
            }
            topology.graph.add_edge(source, target, ());
        }
        Ok(topology)
    }

    fn from_tables(probabilities: &[(String, f64)], sizes: &[(String, usize)]) -> Self {
        let mut topology = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        let names = sizes
            .iter()
            .map(|(node, _)| node)
            .chain(probabilities.iter().map(|(node, _)| node));
        for node in names {
            topology.intern(node);
        }
        topology
    }

    fn intern(&mut self, id: &str) -> NodeIndex {
        if let Some(&ix) = self.index.get(id) {
            return ix;
        }
        let ix = self.graph.add_node(id.to_owned());
        self.index.insert(id.to_owned(), ix);
        ix
    }

    fn indices_of<T>(&self, entries: &[(String, T)]) -> HashSet<NodeIndex> {
        entries
            .iter()
            .filter_map(|(node, _)| self.index.get(node).copied())
            .collect()
    }

    /// Validates the undirected shape and picks the root.
    ///
    /// Only sizeless nodes qualify unless every node is sized, in which case
    /// attribute validation reports the sized root afterwards.
    fn root(&self, sized: &HashSet<NodeIndex>) -> Result<NodeIndex, StructureError> {
        let nodes = self.graph.node_count();
        if nodes == 0 {
            return Err(StructureError::Empty);
        }
        let components = connected_components(&self.graph);
        if components > 1 {
            return Err(StructureError::Disconnected { components });
        }
        let edges = self.graph.edge_count();
        if edges >= nodes {
            return Err(StructureError::Cyclic { nodes, edges });
        }

        let mut candidates: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| !sized.contains(ix))
            .collect();
        if candidates.is_empty() {
            candidates = self.graph.node_indices().collect();
        }
        candidates
            .into_iter()
            .min_by_key(|&ix| {
                let written_as_child = self
                    .graph
                    .neighbors_directed(ix, Direction::Incoming)
                    .next()
                    .is_some();
                (written_as_child, self.graph.neighbors_undirected(ix).count(), ix)
            })
            .ok_or(StructureError::Empty)
    }

    /// Re-orients every edge from parent to child, keeping node indices.
    fn rooted_at(self, root: NodeIndex) -> Self {
        let Self { graph, index } = self;
        let mut rooted = graph.filter_map(|_, id| Some(id.clone()), |_, _| None::<()>);
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(parent) = queue.pop_front() {
            let mut children: Vec<NodeIndex> = graph
                .neighbors_undirected(parent)
                .filter(|&child| visited.insert(child))
                .collect();
            children.sort_unstable();
            for child in children {
                rooted.add_edge(parent, child, ());
                queue.push_back(child);
            }
        }
        Self {
            graph: rooted,
            index,
        }
    }
}

fn collect_table<T: Copy>(
    index: &HashMap<String, NodeIndex>,
    entries: Vec<(String, T)>,
    table: &'static str,
) -> Result<HashMap<NodeIndex, T>, StructureError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut values = HashMap::with_capacity(entries.len());
    for (node, value) in entries {
        let Some(&ix) = index.get(&node) else {
            return Err(StructureError::UnknownNode { node, table });
        };
        if !seen.insert(ix) {
            return Err(StructureError::DuplicateEntry { node, table });
        }
        values.insert(ix, value);
    }
    Ok(values)
}

fn node_kind(
    graph: &DiGraph<String, ()>,
    ix: NodeIndex,
    root: NodeIndex,
    probabilities: &HashMap<NodeIndex, f64>,
    sizes: &HashMap<NodeIndex, usize>,
) -> Result<NodeKind, StructureError> {
    let id = &graph[ix];
    let probability = match probabilities.get(&ix) {
        Some(&p) if p.is_finite() && (0.0..=1.0).contains(&p) => Some(p),
        Some(&p) => {
            return Err(StructureError::ProbabilityOutOfRange {
                node: id.clone(),
                probability: p,
            });
        }
        None => None,
    };
    let missing_probability = || StructureError::MissingProbability { node: id.clone() };

    let has_children = graph
        .neighbors_directed(ix, Direction::Outgoing)
        .next()
        .is_some();
    if has_children {
        if sizes.contains_key(&ix) {
            return Err(StructureError::SizedInternalNode { node: id.clone() });
        }
        let probability = match probability {
            Some(p) => p,
            None if ix == root => 0.0,
            None => return Err(missing_probability()),
        };
        return Ok(NodeKind::Internal { probability });
    }

    let size = sizes
        .get(&ix)
        .copied()
        .ok_or_else(|| StructureError::MissingSize { node: id.clone() })?;
    let probability = probability.ok_or_else(missing_probability)?;
    Ok(NodeKind::Leaf { size, probability })
}

#[cfg(test)]
mod tests;
