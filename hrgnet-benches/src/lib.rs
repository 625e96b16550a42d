//! Benchmark support crate for hrgnet.
//!
//! Builds balanced synthetic dendrograms and the parameter labels used by the
//! Criterion benchmarks for synthesis and attack sweeps.

pub mod error;
pub mod params;
pub mod source;
