//! Command-line interface for hrgnet.
//!
//! `degree` and `synthesize` work on a single dendrogram file. `attack` sweeps
//! a removal attack over a synthesized or generated graph.

mod commands;
mod export;

pub use commands::{
    AttackCommand, BarabasiAlbertArgs, Cli, CliError, Command, DegreeArgs, ErdosRenyiArgs,
    ExecutionSummary, GraphSource, HrgArgs, StrategyArg, SynthesizeArgs, render_summary, run_cli,
};
pub use export::{RECORD_HEADER, write_edges, write_records};

#[cfg(test)]
mod test_helpers;
