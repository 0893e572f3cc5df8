//! Argument parsing and execution of the misgen command.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use misgen_core::render::{
    Layout, NodeColors, RenderError, RenderOptions, parse_hex_color, render_to_file,
};
use misgen_core::{
    ErdosRenyiSampler, GraphSampler, InstanceError, InstanceStats, KingGraphSampler, Sample,
    SamplerError, seeded_rng,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Side length, in pixels, of rendered plots.
pub const DEFAULT_PLOT_SIZE: u32 = 800;

/// Largest accepted plot side length in pixels.
pub const MAX_PLOT_SIZE: u32 = 8192;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "misgen",
    about = "Generates a random instance of a unit disk graph."
)]
pub struct Cli {
    /// Width of the lattice (king model).
    #[arg(short = 'x')]
    pub x: Option<u32>,

    /// Height of the lattice (king model).
    #[arg(short = 'y')]
    pub y: Option<u32>,

    /// Lattice density (king model) or edge probability (Erdos-Renyi model).
    #[arg(short = 'p', long = "probability", allow_negative_numbers = true)]
    pub probability: f64,

    /// Random graph model to sample from.
    #[arg(long, value_enum, default_value_t = Model::King)]
    pub model: Model,

    /// Smallest vertex count (Erdos-Renyi model).
    #[arg(long = "min-n")]
    pub min_n: Option<u32>,

    /// Largest vertex count (Erdos-Renyi model).
    #[arg(long = "max-n")]
    pub max_n: Option<u32>,

    /// Seed for the random generator; drawn at random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the sampled instance to this file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Render the sampled graph to this image file (`.svg` or a bitmap format).
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Side length of the rendered image in pixels.
    #[arg(
        long = "plot-size",
        default_value_t = DEFAULT_PLOT_SIZE,
        value_parser = clap::value_parser!(u32).range(16..=i64::from(MAX_PLOT_SIZE)),
    )]
    pub plot_size: u32,

    /// Fill colour of plotted vertices as `#RRGGBB`; defaults to `#6437FF`.
    #[arg(long = "node-color", value_name = "#RRGGBB")]
    pub node_color: Option<String>,
}

/// Supported random graph models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// Partially occupied lattice with king-move adjacency.
    King,
    /// Independent edges with a fixed probability.
    ErdosRenyi,
}

/// Errors surfaced while executing the command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag required by the selected model was not supplied.
    #[error("`{flag}` is required for the {model} model")]
    MissingArgument {
        /// The missing flag.
        flag: &'static str,
        /// The model that needs it.
        model: &'static str,
    },
    /// Sampler configuration or sampling failed.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// Creating an output file failed.
    #[error("failed to create `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing the instance file failed.
    #[error("failed to write instance to `{path}`: {source}")]
    Instance {
        /// Destination of the instance.
        path: PathBuf,
        /// Underlying instance error.
        #[source]
        source: InstanceError,
    },
    /// Rendering the plot failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Summarises the outcome of executing the command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Model name and parameters, e.g. `king_3_3_1.0`.
    pub sampler: String,
    /// Seed the generator was initialised with.
    pub seed: u64,
    /// Degree summary of the sampled instance.
    pub stats: InstanceStats,
    /// Where the instance was written, if anywhere.
    pub output: Option<PathBuf>,
    /// Where the plot was rendered, if anywhere.
    pub plot: Option<PathBuf>,
}

/// Executes the command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when a model flag is missing, the parameters are
/// invalid, the node colour does not parse, or writing the instance or plot
/// fails.
///
/// # Examples
/// ```
/// # use misgen_cli::cli::{Cli, DEFAULT_PLOT_SIZE, Model, run_cli};
/// let cli = Cli {
///     x: Some(3),
///     y: Some(3),
///     probability: 1.0,
///     model: Model::King,
///     min_n: None,
///     max_n: None,
///     seed: Some(7),
///     output: None,
///     plot: None,
///     plot_size: DEFAULT_PLOT_SIZE,
///     node_color: None,
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.sampler, "king_3_3_1.0");
/// assert_eq!(summary.stats.edges, 20);
/// # Ok::<(), misgen_cli::cli::CliError>(())
/// ```
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let colors = cli
        .node_color
        .as_deref()
        .map(parse_hex_color)
        .transpose()?
        .map_or_else(NodeColors::default, NodeColors::Uniform);
    let seed = cli.seed.unwrap_or_else(rand::random);
    match cli.model {
        Model::King => {
            let x = require(cli.x, "-x", "king")?;
            let y = require(cli.y, "-y", "king")?;
            let sampler = KingGraphSampler::new(x, y, cli.probability)?;
            run_sampler(&sampler, seed, &colors, &cli)
        }
        Model::ErdosRenyi => {
            let min_n = require(cli.min_n, "--min-n", "erdos-renyi")?;
            let max_n = require(cli.max_n, "--max-n", "erdos-renyi")?;
            let sampler = ErdosRenyiSampler::new(min_n, max_n, cli.probability)?;
            run_sampler(&sampler, seed, &colors, &cli)
        }
    }
}

fn require<T>(value: Option<T>, flag: &'static str, model: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { flag, model })
}

#[instrument(skip(sampler, colors, cli), fields(sampler = %sampler))]
fn run_sampler(
    sampler: &impl GraphSampler,
    seed: u64,
    colors: &NodeColors,
    cli: &Cli,
) -> Result<ExecutionSummary, CliError> {
    let sample = sampler.generate(&mut seeded_rng(seed))?;
    let stats = sample.instance().stats();
    info!(
        vertices = stats.vertices,
        edges = stats.edges,
        "sampled graph"
    );

    if let Some(path) = &cli.output {
        write_instance(&sample, path)?;
        info!(path = %path.display(), "wrote instance");
    }
    if let Some(path) = &cli.plot {
        let options = RenderOptions {
            size: cli.plot_size,
            ..RenderOptions::default()
        };
        render_to_file(
            sample.instance(),
            &Layout::for_sample(&sample),
            colors,
            path,
            &options,
        )?;
        info!(path = %path.display(), "rendered plot");
    }

    Ok(ExecutionSummary {
        sampler: sampler.name(),
        seed,
        stats,
        output: cli.output.clone(),
        plot: cli.plot.clone(),
    })
}

fn write_instance(sample: &Sample, path: &Path) -> Result<(), CliError> {
    let file = File::create(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    sample
        .instance()
        .write_to(BufWriter::new(file))
        .map_err(|source| CliError::Instance {
            path: path.to_path_buf(),
            source,
        })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use misgen_cli::cli::{ExecutionSummary, render_summary};
/// # use misgen_core::Instance;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     sampler: "king_2_1_1.0".into(),
///     seed: 1,
///     stats: Instance::from_edges(2, [(0, 1)])?.stats(),
///     output: None,
///     plot: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.starts_with("sampler: king_2_1_1.0\n"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let stats = &summary.stats;
    writeln!(writer, "sampler: {}", summary.sampler)?;
    writeln!(writer, "seed: {}", summary.seed)?;
    writeln!(writer, "vertices: {}", stats.vertices)?;
    writeln!(writer, "edges: {}", stats.edges)?;
    writeln!(
        writer,
        "degree: min {} max {} mean {:.3}",
        stats.min_degree, stats.max_degree, stats.mean_degree
    )?;
    if let Some(path) = &summary.output {
        writeln!(writer, "instance: {}", path.display())?;
    }
    if let Some(path) = &summary.plot {
        writeln!(writer, "plot: {}", path.display())?;
    }
    Ok(())
}
