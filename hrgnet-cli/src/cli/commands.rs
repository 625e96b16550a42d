//! Command implementations and argument parsing for the hrgnet CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use hrgnet_core::{
    AttackError, AttackRecord, AttackSimulatorBuilder, AttackStrategy, Dendrogram,
    DendrogramError, ErdosRenyi, ExecutionStrategy, GeneratorError, Network, Protection,
    SynthesisError, barabasi_albert, erdos_renyi, linspace, synthesize,
};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::export::{write_edges, write_records};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_TRIALS: usize = 10;
const DEFAULT_START: f64 = 0.0;
const DEFAULT_STOP: f64 = 1.0;
const DEFAULT_STEPS: usize = 11;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "hrgnet",
    about = "Synthesize hierarchical random graphs and measure their robustness."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the population and expected average degree of a dendrogram.
    Degree(DegreeArgs),
    /// Build one network from a dendrogram and report its size.
    Synthesize(SynthesizeArgs),
    /// Sweep a removal attack over a graph and report the giant component.
    Attack(AttackCommand),
}

/// Options accepted by the `degree` command.
#[derive(Debug, Args, Clone)]
pub struct DegreeArgs {
    /// Dendrogram file.
    pub path: PathBuf,
}

/// Options accepted by the `synthesize` command.
#[derive(Debug, Args, Clone)]
pub struct SynthesizeArgs {
    /// Dendrogram file.
    pub path: PathBuf,

    /// Seed for the random number generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Write every edge as a tab-separated pair to this file.
    #[arg(long)]
    pub edges: Option<PathBuf>,

    /// Write the bridge edges as tab-separated pairs to this file.
    #[arg(long)]
    pub bridges: Option<PathBuf>,
}

/// Options accepted by the `attack` command.
#[derive(Debug, Args, Clone)]
pub struct AttackCommand {
    /// How victims are chosen.
    #[arg(long, value_enum, default_value_t = StrategyArg::RandomNode)]
    pub strategy: StrategyArg,

    /// Trials per removal fraction.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,

    /// First removal fraction of the grid.
    #[arg(long, default_value_t = DEFAULT_START)]
    pub start: f64,

    /// Last removal fraction of the grid.
    #[arg(long, default_value_t = DEFAULT_STOP)]
    pub stop: f64,

    /// Number of evenly spaced fractions, endpoints included.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Seed for graph generation and for the trial streams.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Exempt bridge edges and their endpoints from removal.
    #[arg(long)]
    pub protect_bridges: bool,

    /// Run every trial on the calling thread.
    #[arg(long)]
    pub sequential: bool,

    /// Write the records as CSV to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Graph to attack.
    #[command(subcommand)]
    pub graph: GraphSource,
}

/// Graph families the `attack` command can build.
#[derive(Debug, Subcommand, Clone)]
pub enum GraphSource {
    /// Hierarchical random graph synthesized from a dendrogram file.
    Hrg(HrgArgs),
    /// Uniform random graph `G(n, p)`.
    ErdosRenyi(ErdosRenyiArgs),
    /// Preferential-attachment graph.
    BarabasiAlbert(BarabasiAlbertArgs),
}

/// Arguments for [`GraphSource::Hrg`].
#[derive(Debug, Args, Clone)]
pub struct HrgArgs {
    /// Dendrogram file.
    pub path: PathBuf,
}

/// Arguments for [`GraphSource::ErdosRenyi`].
#[derive(Debug, Args, Clone)]
pub struct ErdosRenyiArgs {
    /// Number of vertices.
    #[arg(long)]
    pub nodes: usize,

    /// Probability of each edge.
    #[arg(long)]
    pub probability: f64,
}

/// Arguments for [`GraphSource::BarabasiAlbert`].
#[derive(Debug, Args, Clone)]
pub struct BarabasiAlbertArgs {
    /// Number of vertices.
    #[arg(long)]
    pub nodes: usize,

    /// Edges added by every arriving vertex.
    #[arg(long)]
    pub attachments: usize,
}

/// Attack strategies exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Uniformly random vertices.
    RandomNode,
    /// Uniformly random edges.
    RandomEdge,
    /// Highest-degree vertices first.
    TargetedNode,
}

impl From<StrategyArg> for AttackStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::RandomNode => Self::RandomNode,
            StrategyArg::RandomEdge => Self::RandomEdge,
            StrategyArg::TargetedNode => Self::TargetedNode,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing an output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Loading or analysing the dendrogram failed.
    #[error(transparent)]
    Dendrogram(#[from] DendrogramError),
    /// Building the hierarchical network failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    /// Generating a base graph failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// Configuring or running the sweep failed.
    #[error(transparent)]
    Attack(#[from] AttackError),
    /// Bridge protection was requested for a graph without bridges.
    #[error("--protect-bridges needs an hrg graph, not {graph}")]
    ProtectionUnavailable {
        /// Graph family that was requested.
        graph: &'static str,
    },
}

impl CliError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CLI_IO",
            Self::Dendrogram(err) => err
                .structure_code()
                .map(|code| code.as_str())
                .or_else(|| err.format_code().map(|code| code.as_str()))
                .unwrap_or_else(|| err.code().as_str()),
            Self::Synthesis(err) => err.code().as_str(),
            Self::Generator(err) => err.code().as_str(),
            Self::Attack(err) => err.code().as_str(),
            Self::ProtectionUnavailable { .. } => "CLI_PROTECTION_UNAVAILABLE",
        }
    }
}

/// Outcome of a CLI command, ready to be rendered.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of `degree`.
    Degree {
        /// Number of vertices the dendrogram describes.
        total_size: usize,
        /// Expected average degree of a synthesized network.
        average_degree: f64,
    },
    /// Result of `synthesize`.
    Synthesize {
        /// Vertices in the network.
        vertices: usize,
        /// Edges in the network, bridges included.
        edges: usize,
        /// Edges added while merging communities.
        bridges: usize,
    },
    /// Result of `attack`.
    Attack {
        /// Records in fraction order.
        records: Vec<AttackRecord>,
        /// File the records were written to, if any.
        output: Option<PathBuf>,
    },
}

/// Executes the command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, generation, the sweep, or writing an
/// output file fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use hrgnet_cli::cli::{Cli, Command, DegreeArgs, ExecutionSummary, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     "# tree\nR A\nR B\n# probabilities\nR 0.5\nA 0.6\nB 0.6\n# sizes\nA 4\nB 4\n",
/// )?;
/// let cli = Cli {
///     command: Command::Degree(DegreeArgs { path: file.path().to_path_buf() }),
/// };
/// let ExecutionSummary::Degree { total_size, .. } = run_cli(cli)? else {
///     unreachable!("degree yields a degree summary");
/// };
/// assert_eq!(total_size, 8);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Degree(args) => {
            span.record("command", "degree");
            run_degree(&args)
        }
        Command::Synthesize(args) => {
            span.record("command", "synthesize");
            run_synthesize(&args)
        }
        Command::Attack(command) => {
            span.record("command", "attack");
            run_attack(command)
        }
    }
}

pub(super) fn run_degree(args: &DegreeArgs) -> Result<ExecutionSummary, CliError> {
    let dendrogram = Dendrogram::load(&args.path)?;
    let average_degree = dendrogram
        .average_degree()
        .map_err(DendrogramError::from)?;
    Ok(ExecutionSummary::Degree {
        total_size: dendrogram.total_size(),
        average_degree,
    })
}

#[instrument(
    name = "cli.synthesize",
    err,
    skip(args),
    fields(path = %args.path.display(), seed = args.seed),
)]
pub(super) fn run_synthesize(args: &SynthesizeArgs) -> Result<ExecutionSummary, CliError> {
    let dendrogram = Dendrogram::load(&args.path)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let synthesized = synthesize(&dendrogram, &ErdosRenyi, &mut rng)?;
    let network = synthesized.network();

    if let Some(path) = &args.edges {
        write_file(path, |writer| write_edges(&network.edges(), writer))?;
    }
    if let Some(path) = &args.bridges {
        write_file(path, |writer| write_edges(synthesized.bridge_edges(), writer))?;
    }

    Ok(ExecutionSummary::Synthesize {
        vertices: network.vertex_count(),
        edges: network.edge_count(),
        bridges: synthesized.bridge_edges().len(),
    })
}

#[instrument(
    name = "cli.attack",
    err,
    skip(command),
    fields(graph = field::Empty, vertices = field::Empty, protected = command.protect_bridges),
)]
pub(super) fn run_attack(command: AttackCommand) -> Result<ExecutionSummary, CliError> {
    let mut rng = SmallRng::seed_from_u64(command.seed);
    let (network, protection) = build_graph(&command.graph, command.protect_bridges, &mut rng)?;

    let span = Span::current();
    span.record("graph", graph_label(&command.graph));
    span.record("vertices", network.vertex_count());

    let execution = if command.sequential {
        ExecutionStrategy::Sequential
    } else {
        ExecutionStrategy::Auto
    };
    let mut builder = AttackSimulatorBuilder::new()
        .with_fractions(linspace(command.start, command.stop, command.steps))
        .with_trials(command.trials)
        .with_strategy(command.strategy.into())
        .with_seed(command.seed)
        .with_execution_strategy(execution);
    if let Some(protection) = protection {
        builder = builder.with_protection(protection);
    }
    let records = builder.build()?.run(&network)?;

    if let Some(path) = &command.output {
        write_file(path, |writer| write_records(&records, writer))?;
        info!(path = %path.display(), records = records.len(), "records written");
    }
    Ok(ExecutionSummary::Attack {
        records,
        output: command.output,
    })
}

fn build_graph(
    source: &GraphSource,
    protect_bridges: bool,
    rng: &mut SmallRng,
) -> Result<(Network, Option<Protection>), CliError> {
    if protect_bridges && !matches!(source, GraphSource::Hrg(_)) {
        return Err(CliError::ProtectionUnavailable {
            graph: graph_label(source),
        });
    }

    match source {
        GraphSource::Hrg(args) => {
            let dendrogram = Dendrogram::load(&args.path)?;
            let (network, bridges) = synthesize(&dendrogram, &ErdosRenyi, rng)?.into_parts();
            let protection = protect_bridges.then(|| Protection::from_bridges(bridges));
            Ok((network, protection))
        }
        GraphSource::ErdosRenyi(args) => {
            let graph = erdos_renyi(args.nodes, args.probability, rng)?;
            Ok((graph.into_network(), None))
        }
        GraphSource::BarabasiAlbert(args) => {
            let graph = barabasi_albert(args.nodes, args.attachments, rng)?;
            Ok((graph.into_network(), None))
        }
    }
}

pub(super) const fn graph_label(source: &GraphSource) -> &'static str {
    match source {
        GraphSource::Hrg(_) => "hrg",
        GraphSource::ErdosRenyi(_) => "erdos-renyi",
        GraphSource::BarabasiAlbert(_) => "barabasi-albert",
    }
}

fn write_file(
    path: &Path,
    render: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    render(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)
}

/// Renders `summary` to `writer`.
///
/// Attack records go out as CSV unless they were already written to a file.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use hrgnet_cli::cli::{ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Synthesize { vertices: 8, edges: 12, bridges: 2 };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "vertices: 8\nedges: 12\nbridges: 2\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Degree {
            total_size,
            average_degree,
        } => {
            writeln!(writer, "total size: {total_size}")?;
            writeln!(writer, "average degree: {average_degree:.6}")
        }
        ExecutionSummary::Synthesize {
            vertices,
            edges,
            bridges,
        } => {
            writeln!(writer, "vertices: {vertices}")?;
            writeln!(writer, "edges: {edges}")?;
            writeln!(writer, "bridges: {bridges}")
        }
        ExecutionSummary::Attack {
            records,
            output: Some(path),
        } => writeln!(writer, "wrote {} records to {}", records.len(), path.display()),
        ExecutionSummary::Attack {
            records,
            output: None,
        } => write_records(records, writer),
    }
}
