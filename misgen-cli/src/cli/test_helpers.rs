//! Small helpers shared across CLI tests.

use tempfile::TempDir;

use super::{Cli, CliError, DEFAULT_PLOT_SIZE, Model, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Builds a seeded king-model invocation without output files.
pub(super) fn king_cli(x: u32, y: u32, probability: f64) -> Cli {
    Cli {
        x: Some(x),
        y: Some(y),
        probability,
        model: Model::King,
        min_n: None,
        max_n: None,
        seed: Some(42),
        output: None,
        plot: None,
        plot_size: DEFAULT_PLOT_SIZE,
        node_color: None,
    }
}

/// Builds a seeded Erdos-Renyi invocation without output files.
pub(super) fn erdos_renyi_cli(min_n: u32, max_n: u32, probability: f64) -> Cli {
    Cli {
        model: Model::ErdosRenyi,
        x: None,
        y: None,
        min_n: Some(min_n),
        max_n: Some(max_n),
        ..king_cli(0, 0, probability)
    }
}

/// Run CLI and expect an error, panicking with the given message if successful.
pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{}", panic_msg),
        Err(err) => err,
    }
}
