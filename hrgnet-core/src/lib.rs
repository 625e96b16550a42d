//! hrgnet core library.
//!
//! Synthesizes hierarchical random graphs from probabilistic dendrograms and
//! measures how their giant component fragments under random and targeted
//! removal.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attack;
mod components;
mod dendrogram;
mod error;
mod generators;
mod network;
mod selection;
mod statistics;
mod synthesis;

pub use crate::{
    attack::{AttackSimulator, AttackSimulatorBuilder, AttackStrategy, ExecutionStrategy, Protection},
    components::{ComponentExtractor, UnionFindExtractor},
    dendrogram::{Dendrogram, DendrogramNode, DendrogramTables, NodeKind},
    error::{
        AttackError, AttackErrorCode, DendrogramError, DendrogramErrorCode, FormatError,
        FormatErrorCode, GeneratorError, GeneratorErrorCode, StructureError, StructureErrorCode,
        SynthesisError, SynthesisErrorCode,
    },
    generators::{ErdosRenyi, LeafGraphProvider, LocalGraph, barabasi_albert, erdos_renyi},
    network::{Edge, Network, VertexId},
    selection::{rank_by_degree, removal_count, top_fraction},
    statistics::{AttackRecord, FractionSamples, linspace, summarize},
    synthesis::{SynthesizedNetwork, synthesize},
};
