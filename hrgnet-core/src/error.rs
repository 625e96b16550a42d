//! Error types for the hrgnet core library.
//!
//! Every public error enum carries a stable machine-readable code so the CLI
//! and downstream tooling can classify failures without matching on messages.

use std::{fmt, io};

use thiserror::Error;

use crate::attack::ExecutionStrategy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A dendrogram record could not be decoded.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    /// A record did not split into exactly two whitespace-separated fields.
    #[error("line {line}: expected two whitespace-separated fields, found {found}")]
    FieldCount {
        /// One-based line number of the offending record.
        line: usize,
        /// Number of fields found on the line.
        found: usize,
    },
    /// A probability was not a finite number in `[0, 1]`.
    #[error("line {line}: probability `{value}` for node `{node}` is not a number in [0, 1]")]
    InvalidProbability {
        /// One-based line number of the offending record.
        line: usize,
        /// Node the probability was declared for.
        node: String,
        /// Raw text of the rejected value.
        value: String,
    },
    /// A size was not a non-negative integer.
    #[error("line {line}: size `{value}` for node `{node}` is not a non-negative integer")]
    InvalidSize {
        /// One-based line number of the offending record.
        line: usize,
        /// Node the size was declared for.
        node: String,
        /// Raw text of the rejected value.
        value: String,
    },
    /// A section marker appeared after the size table had started.
    #[error("line {line}: unexpected section marker after the size table")]
    UnexpectedSection {
        /// One-based line number of the extra marker.
        line: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`FormatError`] variants.
    enum FormatErrorCode for FormatError {
        /// A record did not split into exactly two fields.
        FieldCount => FieldCount { .. } => "FORMAT_FIELD_COUNT",
        /// A probability was not a finite number in `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "FORMAT_INVALID_PROBABILITY",
        /// A size was not a non-negative integer.
        InvalidSize => InvalidSize { .. } => "FORMAT_INVALID_SIZE",
        /// A section marker appeared after the size table.
        UnexpectedSection => UnexpectedSection { .. } => "FORMAT_UNEXPECTED_SECTION",
    }
}

/// The dendrogram tables do not describe a valid probabilistic tree.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StructureError {
    /// No node was declared at all.
    #[error("the dendrogram declares no nodes")]
    Empty,
    /// An edge connects a node to itself.
    #[error("edge `{node}` -> `{node}` is a self loop")]
    SelfLoop {
        /// Node appearing on both ends of the edge.
        node: String,
    },
    /// The same pair of nodes is connected twice.
    #[error("edge between `{source_node}` and `{target_node}` is declared more than once")]
    DuplicateEdge {
        /// Left endpoint of the repeated line.
        source_node: String,
        /// Right endpoint of the repeated line.
        target_node: String,
    },
    /// The edge list contains a cycle.
    #[error("the edge list contains a cycle ({edges} edges over {nodes} nodes)")]
    Cyclic {
        /// Number of nodes in the dendrogram.
        nodes: usize,
        /// Number of edges in the dendrogram.
        edges: usize,
    },
    /// The edge list splits into several components.
    #[error("the edge list forms {components} disconnected components")]
    Disconnected {
        /// Number of weakly connected components.
        components: usize,
    },
    /// A table references a node that the edge list never mentions.
    #[error("{table} table references unknown node `{node}`")]
    UnknownNode {
        /// Node absent from the edge list.
        node: String,
        /// Table containing the reference.
        table: &'static str,
    },
    /// A node appears twice in the same table.
    #[error("{table} table declares node `{node}` more than once")]
    DuplicateEntry {
        /// Repeated node.
        node: String,
        /// Table containing the repetition.
        table: &'static str,
    },
    /// A node with children also declares a leaf size.
    #[error("node `{node}` has children but declares a size")]
    SizedInternalNode {
        /// Offending node.
        node: String,
    },
    /// A childless node has no size.
    #[error("leaf `{node}` has no size")]
    MissingSize {
        /// Offending node.
        node: String,
    },
    /// A leaf or non-root internal node has no probability.
    #[error("node `{node}` has no probability")]
    MissingProbability {
        /// Offending node.
        node: String,
    },
    /// A probability supplied programmatically lies outside `[0, 1]`.
    #[error("probability {probability} for node `{node}` lies outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Offending node.
        node: String,
        /// Rejected probability.
        probability: f64,
    },
    /// A node's size could not be derived from its children.
    #[error("size of node `{node}` cannot be resolved from its children")]
    Unresolved {
        /// Node whose size stayed unknown.
        node: String,
    },
    /// All leaves are empty so no average degree exists.
    #[error("the dendrogram has no vertices")]
    ZeroPopulation,
}

define_error_codes! {
    /// Stable codes describing [`StructureError`] variants.
    enum StructureErrorCode for StructureError {
        /// No node was declared.
        Empty => Empty => "STRUCTURE_EMPTY",
        /// An edge connects a node to itself.
        SelfLoop => SelfLoop { .. } => "STRUCTURE_SELF_LOOP",
        /// The same pair of nodes is connected twice.
        DuplicateEdge => DuplicateEdge { .. } => "STRUCTURE_DUPLICATE_EDGE",
        /// The edge list contains a cycle.
        Cyclic => Cyclic { .. } => "STRUCTURE_CYCLIC",
        /// The edge list is disconnected.
        Disconnected => Disconnected { .. } => "STRUCTURE_DISCONNECTED",
        /// A table references an unknown node.
        UnknownNode => UnknownNode { .. } => "STRUCTURE_UNKNOWN_NODE",
        /// A table repeats a node.
        DuplicateEntry => DuplicateEntry { .. } => "STRUCTURE_DUPLICATE_ENTRY",
        /// A node with children declares a size.
        SizedInternalNode => SizedInternalNode { .. } => "STRUCTURE_SIZED_INTERNAL_NODE",
        /// A childless node has no size.
        MissingSize => MissingSize { .. } => "STRUCTURE_MISSING_SIZE",
        /// A node lacks a probability.
        MissingProbability => MissingProbability { .. } => "STRUCTURE_MISSING_PROBABILITY",
        /// A probability lies outside `[0, 1]`.
        ProbabilityOutOfRange => ProbabilityOutOfRange { .. } => "STRUCTURE_PROBABILITY_OUT_OF_RANGE",
        /// A node's size could not be resolved.
        Unresolved => Unresolved { .. } => "STRUCTURE_UNRESOLVED",
        /// The dendrogram has no vertices.
        ZeroPopulation => ZeroPopulation => "STRUCTURE_ZERO_POPULATION",
    }
}

/// Error produced while loading or analysing a [`crate::Dendrogram`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DendrogramError {
    /// A record could not be decoded.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The decoded tables do not form a valid tree.
    #[error(transparent)]
    Structure(#[from] StructureError),
    /// Reading the source failed.
    #[error("failed to read dendrogram: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`DendrogramError`] variants.
    enum DendrogramErrorCode for DendrogramError {
        /// A record could not be decoded.
        Format => Format(..) => "DENDROGRAM_FORMAT",
        /// The tables do not form a valid tree.
        Structure => Structure(..) => "DENDROGRAM_STRUCTURE",
        /// Reading the source failed.
        Io => Io { .. } => "DENDROGRAM_IO",
    }
}

impl DendrogramError {
    /// Retrieve the inner [`FormatErrorCode`] when the error is a format failure.
    #[must_use]
    pub const fn format_code(&self) -> Option<FormatErrorCode> {
        match self {
            Self::Format(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`StructureErrorCode`] when the error is a structural failure.
    #[must_use]
    pub const fn structure_code(&self) -> Option<StructureErrorCode> {
        match self {
            Self::Structure(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Error produced by a random-graph generator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeneratorError {
    /// Edge probability was not a finite number in `[0, 1]`.
    #[error("edge probability {probability} lies outside [0, 1]")]
    InvalidProbability {
        /// Rejected probability.
        probability: f64,
    },
    /// Preferential attachment needs `1 <= attachments < nodes`.
    #[error("preferential attachment needs 1 <= attachments < nodes (got {attachments} for {nodes} nodes)")]
    InvalidAttachment {
        /// Requested edges per arriving vertex.
        attachments: usize,
        /// Requested vertex count.
        nodes: usize,
    },
    /// A generated edge references a vertex beyond the graph.
    #[error("edge endpoint {vertex} is outside a graph of {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending endpoint.
        vertex: usize,
        /// Number of vertices in the generated graph.
        vertex_count: usize,
    },
    /// A provider returned a graph of the wrong size.
    #[error("provider returned {actual} vertices but {expected} were requested")]
    SizeMismatch {
        /// Requested vertex count.
        expected: usize,
        /// Vertex count actually returned.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GeneratorError`] variants.
    enum GeneratorErrorCode for GeneratorError {
        /// Edge probability outside `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "GENERATOR_INVALID_PROBABILITY",
        /// Invalid attachment count.
        InvalidAttachment => InvalidAttachment { .. } => "GENERATOR_INVALID_ATTACHMENT",
        /// Edge endpoint outside the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "GENERATOR_VERTEX_OUT_OF_RANGE",
        /// Returned graph has the wrong size.
        SizeMismatch => SizeMismatch { .. } => "GENERATOR_SIZE_MISMATCH",
    }
}

/// Error produced while synthesizing a hierarchical random graph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SynthesisError {
    /// No sibling pair could be merged although several communities remain.
    #[error("no mergeable sibling pair among remaining communities [{}]", .remaining.join(", "))]
    MalformedDendrogram {
        /// Dendrogram ids of the communities still active when merging stalled.
        remaining: Vec<String>,
    },
    /// The leaf graph provider failed for a leaf.
    #[error("leaf provider failed for `{node}`: {error}")]
    LeafProvider {
        /// Leaf whose community could not be generated.
        node: String,
        /// Underlying generator failure.
        #[source]
        error: GeneratorError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SynthesisError`] variants.
    enum SynthesisErrorCode for SynthesisError {
        /// Merging stalled with several communities left.
        MalformedDendrogram => MalformedDendrogram { .. } => "SYNTHESIS_MALFORMED_DENDROGRAM",
        /// The leaf graph provider failed.
        LeafProvider => LeafProvider { .. } => "SYNTHESIS_LEAF_PROVIDER",
    }
}

/// Error produced while configuring or running an attack sweep.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AttackError {
    /// The requested victim count exceeds the removable population.
    #[error(
        "fraction {fraction} requests {requested} victims but only {available} are removable"
    )]
    InvalidFraction {
        /// Removal fraction of the failing trial.
        fraction: f64,
        /// Victims requested by `floor(population * fraction)`.
        requested: usize,
        /// Unprotected population available for removal.
        available: usize,
    },
    /// A fraction in the grid is not a finite number in `[0, 1]`.
    #[error("removal fraction {fraction} lies outside [0, 1]")]
    FractionOutOfRange {
        /// Rejected fraction.
        fraction: f64,
    },
    /// The fraction grid is empty.
    #[error("the removal-fraction grid is empty")]
    EmptyGrid,
    /// At least one trial per fraction is required.
    #[error("trials per fraction must be at least 1")]
    ZeroTrials,
    /// A fraction reached the aggregator without samples.
    #[error("fraction {fraction} has no trial samples")]
    EmptySamples {
        /// Fraction lacking samples.
        fraction: f64,
    },
    /// The requested execution strategy is unavailable in this build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`AttackError`] variants.
    enum AttackErrorCode for AttackError {
        /// Victim count exceeds the removable population.
        InvalidFraction => InvalidFraction { .. } => "ATTACK_INVALID_FRACTION",
        /// Fraction outside `[0, 1]`.
        FractionOutOfRange => FractionOutOfRange { .. } => "ATTACK_FRACTION_OUT_OF_RANGE",
        /// Empty fraction grid.
        EmptyGrid => EmptyGrid => "ATTACK_EMPTY_GRID",
        /// Zero trials requested.
        ZeroTrials => ZeroTrials => "ATTACK_ZERO_TRIALS",
        /// A fraction has no samples.
        EmptySamples => EmptySamples { .. } => "ATTACK_EMPTY_SAMPLES",
        /// Execution strategy unavailable.
        BackendUnavailable => BackendUnavailable { .. } => "ATTACK_BACKEND_UNAVAILABLE",
    }
}
