//! Argument groups shared across subcommands.
//!
//! [`GlobalArgs`] is flattened into [`super::Cli`] and applies everywhere.
//! [`SourceArgs`] is flattened into each command that reads templates.

use std::path::PathBuf;

use clap::{ArgAction, Args, builder::FalseyValueParser};

/// Flags accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Logging verbosity: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - Info level
    -vv     - Debug level (backend resolution, loads)
    -vvv    - Trace level"
    )]
    pub verbose: u8,

    /// Only print errors and command results.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colours. Honours `NO_COLOR` (<https://no-color.org>):
    /// any value other than an empty or false-like one turns colour off.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Read configuration from FILE instead of the default location.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "STRATA_CONFIG",
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// How the CLI renders its own messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    /// Coloured, decorated output.
    Human,
    /// Undecorated text.
    Plain,
    /// JSON documents on stdout.
    Json,
}

/// Where templates come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Locator (`dir::file:///srv/site`, `memory://x`) or backend name.
    #[arg(
        short = 's',
        long = "source",
        env = "STRATA_SOURCE",
        value_name = "LOCATOR",
        help = "Template source locator or backend name"
    )]
    pub source: Option<String>,

    /// Directory inside the source that template names are relative to.
    #[arg(
        long = "search-path",
        value_name = "PATH",
        help = "Prefix applied to every template name"
    )]
    pub search_path: Option<String>,

    /// Extra backend option; repeat for several.
    #[arg(
        short = 'o',
        long = "option",
        value_name = "KEY=VALUE",
        help = "Backend storage option (repeatable)"
    )]
    pub options: Vec<String>,
}
