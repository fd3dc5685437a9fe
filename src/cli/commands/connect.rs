//! Connect command implementation.
//!
//! The `modkeeper connect` command prints the commands an operator pastes
//! into a PowerShell session to sign in with each installed module. For
//! modules that are not installed it prints the install line instead.

use crate::cli::args::ConnectArgs;
use crate::config::ModkeeperConfig;
use crate::error::Result;
use crate::modules::{manual_install_command, ModuleRepository, TargetPackage};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The connect command implementation.
pub struct ConnectCommand<'a> {
    config: &'a ModkeeperConfig,
    repository: &'a dyn ModuleRepository,
    args: ConnectArgs,
}

impl<'a> ConnectCommand<'a> {
    /// Create a new connect command.
    pub fn new(
        config: &'a ModkeeperConfig,
        repository: &'a dyn ModuleRepository,
        args: ConnectArgs,
    ) -> Self {
        Self {
            config,
            repository,
            args,
        }
    }

    fn is_installed(&self, target: &TargetPackage) -> bool {
        match self.repository.installed_version(&target.name) {
            Ok(version) => version.is_some(),
            Err(e) => {
                tracing::debug!("Treating {} as not installed: {}", target.name, e);
                false
            }
        }
    }
}

impl Command for ConnectCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let theme = display::theme();
        let mut not_installed = Vec::new();

        ui.show_header("Connection commands");
        for target in &self.config.targets {
            if !self.args.all && !self.is_installed(target) {
                not_installed.push(target);
                continue;
            }
            ui.message(&format!("# {}", target.name));
            match &target.connect_hint {
                Some(hint) => ui.message(&theme.command.apply_to(hint).to_string()),
                None => ui.message(&format!("Import-Module {}", target.name)),
            }
            ui.message("");
        }

        if !not_installed.is_empty() {
            ui.warning(&format!(
                "{} not installed",
                display::plural(not_installed.len(), "module")
            ));
            for target in not_installed {
                ui.show_hint(&manual_install_command(
                    &target.name,
                    &self.config.powershell.repository,
                ));
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{MockRepository, RepositoryCall};
    use crate::ui::MockUI;

    fn config() -> ModkeeperConfig {
        ModkeeperConfig {
            targets: vec![
                TargetPackage::new("Teams", "").with_connect_hint("Connect-MicrosoftTeams"),
                TargetPackage::new("Plain", ""),
                TargetPackage::new("Absent", "").with_connect_hint("Connect-Absent"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn shows_hints_for_installed_modules_only() {
        let config = config();
        let repo = MockRepository::new()
            .with_installed("Teams", &["6.0.0"])
            .with_installed("Plain", &["1.0"]);
        let cmd = ConnectCommand::new(&config, &repo, ConnectArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("Connect-MicrosoftTeams"));
        assert!(ui.has_message("Import-Module Plain"));
        assert!(!ui.has_message("Connect-Absent"));
        assert!(ui.has_warning("1 module not installed"));
        assert!(ui.has_hint("Install-Module -Name 'Absent'"));
    }

    #[test]
    fn all_shows_every_module_without_querying() {
        let config = config();
        let repo = MockRepository::new();
        let cmd = ConnectCommand::new(&config, &repo, ConnectArgs { all: true });
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("Connect-Absent"));
        assert!(ui.warnings().is_empty());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn never_asks_for_latest_versions() {
        let config = config();
        let repo = MockRepository::new();
        let cmd = ConnectCommand::new(&config, &repo, ConnectArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(repo
            .calls()
            .iter()
            .all(|c| matches!(c, RepositoryCall::InstalledVersion(_))));
    }
}
