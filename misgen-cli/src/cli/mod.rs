//! Command-line interface orchestration for the misgen instance generator.
//!
//! A single command samples one graph, optionally writes it as an instance
//! file and renders it, then reports a short summary.

mod commands;

pub use commands::{
    Cli, CliError, DEFAULT_PLOT_SIZE, ExecutionSummary, MAX_PLOT_SIZE, Model, render_summary,
    run_cli,
};

#[cfg(test)]
mod test_helpers;
