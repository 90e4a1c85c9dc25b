// CLI module
// Command-line interface, argument parsing and command execution

mod args;
pub mod commands;

pub use args::{AddArgs, CliArgs, Command, EditArgs, ListArgs, OutputFormat};
pub use commands::run;

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Reads the process arguments into a `CliArgs`: the global flags
/// (`--data-dir`, `--user`, `--offline`, `-v`) and exactly one subcommand
/// with its own options. Amounts, dates, months and ids are already parsed
/// and range-checked when this returns.
///
/// If parsing fails (an unknown subcommand, a missing required option, a
/// month outside 1-12) or `--help` is given, clap prints the
/// error or help text and exits the process.
///
/// # Returns
///
/// Returns a `CliArgs` struct with the parsed command-line arguments, ready
/// for [`CliArgs::to_config`] and [`run`].
///
/// # Examples
///
/// ```no_run
/// let args = ledgerbook::cli::parse_args();
/// let config = args.to_config();
/// println!("Using data in {}", config.data_dir.display());
/// ```
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
