//! CLI module graph.

pub mod check;
pub mod command;
pub mod list;
pub mod output;

use anyhow::Result;

use command::{CheckCommand, Cli, ColorChoice, Commands};
use output::OutputConfig;

/// Apply global flags, then run the selected command.
///
/// # Errors
///
/// Configuration or load failures, with context for the operator.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.color {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    match cli.command {
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
        Commands::List(args) => list::execute(&args).await,
    }
}
