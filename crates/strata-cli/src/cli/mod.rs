//! CLI argument definitions using the clap derive API.
//!
//! Argument names, aliases, help text and value enums live here. No
//! business logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat, SourceArgs};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "strata",
    bin_name = "strata",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Load and render templates from any filesystem backend",
    long_about = "Strata reads Jinja templates from local disk, memory or any \
                  registered backend, addressed by a locator such as \
                  dir::file:///srv/site.",
    after_help = "EXAMPLES:\n\
        \x20 strata list   -s dir::file:///srv/site --ext html\n\
        \x20 strata show   -s dir::file:///srv/site --search-path templates index.html\n\
        \x20 strata render -s dir::file:///srv/site index.html --var title=Home\n\
        \x20 strata completions bash > /usr/share/bash-completion/completions/strata",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List templates in a source.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 strata list -s dir::file:///srv/site\n\
            \x20 strata list -s dir::file:///srv/site --ext html --ext txt\n\
            \x20 strata list --format json"
    )]
    List(ListArgs),

    /// Print a template's source text.
    #[command(
        visible_alias = "cat",
        about = "Print template source",
        after_help = "EXAMPLES:\n\
            \x20 strata show index.html\n\
            \x20 strata show --search-path templates partials/nav.html"
    )]
    Show(ShowArgs),

    /// Render a template with variables.
    #[command(
        visible_alias = "r",
        about = "Render a template",
        after_help = "EXAMPLES:\n\
            \x20 strata render index.html --var title=Home --var count=3\n\
            \x20 strata render index.html --vars context.json --out index.out.html"
    )]
    Render(RenderArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 strata init\n\
            \x20 strata init --force\n\
            \x20 strata -c ./strata.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 strata completions bash > ~/.local/share/bash-completion/completions/strata\n\
            \x20 strata completions zsh  > ~/.zfunc/_strata\n\
            \x20 strata completions fish > ~/.config/fish/completions/strata.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 strata config get loader.source\n\
            \x20 strata config list\n\
            \x20 strata config path"
    )]
    Config(ConfigCommands),
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only list names ending in one of these extensions.
    #[arg(
        short = 'e',
        long = "ext",
        value_name = "EXT",
        help = "Filter by file extension (repeatable)"
    )]
    pub extensions: Vec<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for `strata list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Header plus indented names.
    Table,
    /// One name per line.
    List,
    /// JSON array of names.
    Json,
}

// ── show ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(value_name = "NAME", help = "Template name")]
    pub name: String,
}

// ── render ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(value_name = "NAME", help = "Template name")]
    pub name: String,

    /// `KEY=VALUE`; the value is parsed as JSON when it is valid JSON.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        help = "Template variable (repeatable)"
    )]
    pub vars: Vec<String>,

    /// JSON object file; `--var` entries override its keys.
    #[arg(
        long = "vars",
        value_name = "FILE",
        help = "JSON file with template variables"
    )]
    pub vars_file: Option<PathBuf>,

    #[arg(
        long = "out",
        value_name = "FILE",
        help = "Write output to FILE instead of stdout"
    )]
    pub out: Option<PathBuf>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `loader.search_path`.
        key: String,
    },
    /// Print the whole effective configuration.
    List,
    /// Print the configuration file path in use.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_list_with_filters() {
        let cli = Cli::parse_from([
            "strata", "list", "-s", "memory://x", "--ext", "html", "--ext", "txt", "--format",
            "json",
        ]);
        let Commands::List(args) = cli.command else {
            panic!("expected List command");
        };
        assert_eq!(args.source.source.as_deref(), Some("memory://x"));
        assert_eq!(args.extensions, vec!["html", "txt"]);
        assert_eq!(args.format, ListFormat::Json);
    }

    #[test]
    fn parse_render_with_vars_and_options() {
        let cli = Cli::parse_from([
            "strata",
            "render",
            "index.html",
            "--search-path",
            "templates",
            "-o",
            "anon=true",
            "--var",
            "title=Home",
            "--var",
            "n=3",
            "--out",
            "out.html",
        ]);
        let Commands::Render(args) = cli.command else {
            panic!("expected Render command");
        };
        assert_eq!(args.name, "index.html");
        assert_eq!(args.source.search_path.as_deref(), Some("templates"));
        assert_eq!(args.source.options, vec!["anon=true"]);
        assert_eq!(args.vars.len(), 2);
        assert_eq!(args.out, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn show_requires_name() {
        assert!(Cli::try_parse_from(["strata", "show"]).is_err());
    }

    #[test]
    fn aliases_resolve() {
        let cli = Cli::parse_from(["strata", "cat", "a.html"]);
        assert!(matches!(cli.command, Commands::Show(_)));
        let cli = Cli::parse_from(["strata", "ls"]);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["strata", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
