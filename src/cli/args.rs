//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Modkeeper - Keep cloud-administration PowerShell modules installed and current.
#[derive(Debug, Parser)]
#[command(name = "modkeeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides MODKEEPER_CONFIG and the user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true, env = "MODKEEPER_YES")]
    pub yes: bool,

    /// Never prompt; use defaults or MODKEEPER_PROMPT_<KEY> answers
    #[arg(long, global = true, env = "MODKEEPER_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which modules are missing or outdated (default)
    Check(CheckArgs),

    /// Install missing modules
    Install(InstallArgs),

    /// Replace outdated modules with the latest release
    Update(UpdateArgs),

    /// Update outdated modules, then install missing ones
    Fix(FixArgs),

    /// Print connection commands for installed modules
    Connect(ConnectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Print the status snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Act only on these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    /// Act only on these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments for the `fix` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FixArgs {
    /// Act only on these modules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Arguments for the `connect` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConnectArgs {
    /// Show every configured module, installed or not
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["modkeeper"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.yes);
    }

    #[test]
    fn check_json_flag() {
        let cli = Cli::try_parse_from(["modkeeper", "check", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => assert!(args.json),
            other => panic!("Expected Check, got {:?}", other),
        }
    }

    #[test]
    fn only_is_comma_separated() {
        let cli =
            Cli::try_parse_from(["modkeeper", "install", "--only", "Az,MicrosoftTeams"]).unwrap();
        match cli.command {
            Some(Commands::Install(args)) => {
                assert_eq!(args.only, vec!["Az", "MicrosoftTeams"]);
            }
            other => panic!("Expected Install, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "modkeeper",
            "fix",
            "--yes",
            "--config",
            "/tmp/m.yml",
            "--quiet",
        ])
        .unwrap();
        assert!(cli.yes);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.yml")));
        assert!(matches!(cli.command, Some(Commands::Fix(_))));
    }

    #[test]
    fn connect_all_flag() {
        let cli = Cli::try_parse_from(["modkeeper", "connect", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Connect(ConnectArgs { all: true }))
        ));
    }

    #[test]
    fn completions_requires_known_shell() {
        assert!(Cli::try_parse_from(["modkeeper", "completions", "bash"]).is_ok());
        assert!(Cli::try_parse_from(["modkeeper", "completions", "tcsh"]).is_err());
    }
}
