//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use hrgnet_core::{AttackError, StructureError, SynthesisError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic dendrogram configuration was rejected.
    #[error("synthetic dendrogram generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The generated tables did not form a valid dendrogram.
    #[error("dendrogram construction failed: {0}")]
    Structure(#[from] StructureError),
    /// Network synthesis failed.
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    /// Attack configuration failed.
    #[error("attack configuration failed: {0}")]
    Attack(#[from] AttackError),
}
