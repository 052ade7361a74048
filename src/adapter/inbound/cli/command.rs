//! Command-line interface definitions.
//!
//! Defines the CLI structure for the console-store binary using `clap`.

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Load and inspect console collections from the backend API
#[derive(Parser, Debug)]
#[command(name = "console-store")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Load one collection and print it
    List(ListArgs),
}

/// Subcommands for `console-store check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Collections the `list` command can load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CollectionArg {
    Projects,
    Devices,
    Controllers,
    Rules,
    Rooms,
    Modules,
    Measurements,
    Alerts,
    Members,
    Permissions,
}

impl CollectionArg {
    #[must_use]
    pub fn is_project_scoped(self) -> bool {
        !matches!(self, Self::Projects | Self::Permissions)
    }
}

impl fmt::Display for CollectionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Projects => "projects",
            Self::Devices => "devices",
            Self::Controllers => "controllers",
            Self::Rules => "rules",
            Self::Rooms => "rooms",
            Self::Modules => "modules",
            Self::Measurements => "measurements",
            Self::Alerts => "alerts",
            Self::Members => "members",
            Self::Permissions => "permissions",
        };
        f.write_str(name)
    }
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Collection to load
    pub collection: CollectionArg,

    /// Project to load project-scoped collections for
    #[arg(short, long)]
    pub project: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Event list page (alerts only)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// List accepted alerts instead of open ones (alerts only)
    #[arg(long)]
    pub accepted: bool,
}
