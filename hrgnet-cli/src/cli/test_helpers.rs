//! Fixtures shared by the CLI tests.

use std::fs;
use std::io;
use std::path::PathBuf;

use tempfile::TempDir;

use super::{AttackCommand, Cli, CliError, GraphSource, StrategyArg, run_cli};

/// Two four-vertex leaves under one root.
pub(super) const CHERRY: &str = "\
# tree
R A
R B
# probabilities
R 0.5
A 0.6
B 0.6
# sizes
A 4
B 4
";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_dendrogram(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Attack command with a three-point grid and two sequential trials.
pub(super) fn small_attack(graph: GraphSource) -> AttackCommand {
    AttackCommand {
        strategy: StrategyArg::RandomNode,
        trials: 2,
        start: 0.0,
        stop: 1.0,
        steps: 3,
        seed: 5,
        protect_bridges: false,
        sequential: true,
        output: None,
        graph,
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
