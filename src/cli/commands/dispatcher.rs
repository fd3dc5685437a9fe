//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{CheckArgs, Cli, Commands, ConnectArgs};
use crate::config::ModkeeperConfig;
use crate::error::Result;
use crate::modules::{ModuleRepository, PowerShellGallery};
use crate::ui::UserInterface;

use super::check::CheckCommand;
use super::completions::CompletionsCommand;
use super::connect::ConnectCommand;
use super::fix::FixCommand;
use super::install::InstallCommand;
use super::reconcile::ActionContext;
use super::update::UpdateCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: ModkeeperConfig,
    assume_yes: bool,
}

impl CommandDispatcher {
    /// Create a dispatcher over a loaded configuration.
    pub fn new(config: ModkeeperConfig, assume_yes: bool) -> Self {
        Self { config, assume_yes }
    }

    /// Get the configuration commands run against.
    pub fn config(&self) -> &ModkeeperConfig {
        &self.config
    }

    /// Dispatch and execute a command against the PowerShell Gallery.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let gallery = PowerShellGallery::new(&self.config.powershell);

        let queries_gallery = !matches!(
            cli.command,
            Some(Commands::Completions(_)) | Some(Commands::Connect(ConnectArgs { all: true }))
        );
        if queries_gallery && !gallery.is_available() {
            if let Some(result) = missing_executable(cli, gallery.executable(), ui) {
                return Ok(result);
            }
        }

        self.dispatch_with(cli, &gallery, ui)
    }

    /// Dispatch and execute a command against any repository.
    pub fn dispatch_with(
        &self,
        cli: &Cli,
        repository: &dyn ModuleRepository,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let ctx = ActionContext {
            config: &self.config,
            repository,
            assume_yes: self.assume_yes,
        };

        match &cli.command {
            Some(Commands::Check(args)) => {
                CheckCommand::new(&self.config, repository, args.clone()).execute(ui)
            }
            Some(Commands::Install(args)) => InstallCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Update(args)) => UpdateCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Fix(args)) => FixCommand::new(ctx, args.clone()).execute(ui),
            Some(Commands::Connect(args)) => {
                ConnectCommand::new(&self.config, repository, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                // Default to a read-only check
                CheckCommand::new(&self.config, repository, CheckArgs::default()).execute(ui)
            }
        }
    }
}

/// Report a PowerShell executable that could not be found.
///
/// Commands that change modules stop here with a failure. Read-only
/// commands carry on and see every module as missing; with `check --json`
/// the warning goes to the log so stdout stays parseable.
fn missing_executable(
    cli: &Cli,
    executable: &str,
    ui: &mut dyn UserInterface,
) -> Option<CommandResult> {
    let msg = format!("PowerShell executable '{}' not found", executable);
    match &cli.command {
        Some(Commands::Install(_)) | Some(Commands::Update(_)) | Some(Commands::Fix(_)) => {
            ui.error(&msg);
            ui.show_hint("Install PowerShell 7 or set powershell.executable in the config");
            Some(CommandResult::failure(1))
        }
        Some(Commands::Check(CheckArgs { json: true })) => {
            tracing::warn!("{}; every module will show as missing", msg);
            None
        }
        _ => {
            ui.warning(&format!("{}; every module will show as missing", msg));
            None
        }
    }
}
