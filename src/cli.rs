//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::resources::Language;

/// Top-level CLI entry point for the device profile selector.
#[derive(Parser, Debug)]
#[command(
    name = "dtb-selector",
    about = "Select a handheld console profile and deploy its device-tree files",
    version
)]
pub struct Cli {
    /// Subcommand to run; defaults to `deploy`
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, with `deploy` filled in when none was given.
    #[must_use]
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Deploy(DeployOpts::default()))
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Asset store holding one directory per console and shared resource
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Directory to clean and deploy into (default: current directory)
    #[arg(long, global = true)]
    pub dest: Option<PathBuf>,

    /// Catalog file overriding the built-in device list
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Select a console and deploy its files (default)
    Deploy(DeployOpts),
    /// List brands and devices in the catalog
    List(ListOpts),
    /// Check the catalog against the asset store
    Check,
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Deploy(_) => "deploy",
            Self::List(_) => "list",
            Self::Check => "check",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Language answers accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    /// English (no marker)
    En,
    /// Chinese (writes the `.cn` marker)
    Cn,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Self::English,
            LanguageArg::Cn => Self::Chinese,
        }
    }
}

/// Options for the `deploy` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct DeployOpts {
    /// Skip the introductory notice
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Apply this language without asking
    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ListOpts {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_deploy() {
        let cli = Cli::parse_from(["dtb-selector"]);
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command_or_default(),
            Command::Deploy(DeployOpts {
                yes: false,
                language: None
            })
        ));
    }

    #[test]
    fn parse_deploy_options() {
        let cli = Cli::parse_from(["dtb-selector", "deploy", "-y", "--language", "cn"]);
        assert!(
            matches!(&cli.command, Some(Command::Deploy(_))),
            "Expected Deploy command"
        );
        if let Some(Command::Deploy(opts)) = cli.command {
            assert!(opts.yes);
            assert_eq!(opts.language.map(Language::from), Some(Language::Chinese));
        }
    }

    #[test]
    fn parse_invalid_language_fails() {
        assert!(Cli::try_parse_from(["dtb-selector", "deploy", "--language", "fr"]).is_err());
    }

    #[test]
    fn parse_dry_run_short() {
        let cli = Cli::parse_from(["dtb-selector", "-d", "deploy"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_global_paths_after_subcommand() {
        let cli = Cli::parse_from([
            "dtb-selector",
            "check",
            "--assets",
            "/media/consoles",
            "--dest",
            "/media/boot",
            "--catalog",
            "/tmp/catalog.toml",
        ]);
        assert!(matches!(cli.command, Some(Command::Check)));
        assert_eq!(cli.global.assets, Some(PathBuf::from("/media/consoles")));
        assert_eq!(cli.global.dest, Some(PathBuf::from("/media/boot")));
        assert_eq!(cli.global.catalog, Some(PathBuf::from("/tmp/catalog.toml")));
    }

    #[test]
    fn parse_list_json() {
        let cli = Cli::parse_from(["dtb-selector", "list", "--json"]);
        assert!(matches!(cli.command, Some(Command::List(ListOpts { json: true }))));
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["dtb-selector", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Some(Command::Completions(CompletionsOpts {
                shell: clap_complete::Shell::Bash
            }))
        ));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["dtb-selector", "-v", "version"]);
        assert!(cli.verbose);
        assert_eq!(cli.command_or_default().name(), "version");
    }
}
