//! Install command implementation.
//!
//! The `modkeeper install` command installs every target that is not
//! installed. Outdated modules are left alone.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::reconcile::{run_action, Action, ActionContext};

/// The install command implementation.
pub struct InstallCommand<'a> {
    ctx: ActionContext<'a>,
    args: InstallArgs,
}

impl<'a> InstallCommand<'a> {
    /// Create a new install command.
    pub fn new(ctx: ActionContext<'a>, args: InstallArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for InstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        run_action(Action::Install, &self.ctx, &self.args.only, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModkeeperConfig;
    use crate::modules::{MockRepository, TargetPackage};
    use crate::ui::MockUI;

    #[test]
    fn install_leaves_outdated_modules_alone() {
        let config = ModkeeperConfig {
            targets: vec![TargetPackage::new("Old", ""), TargetPackage::new("New", "")],
            ..Default::default()
        };
        let repo = MockRepository::new()
            .with_installed("Old", &["1.0"])
            .with_latest("Old", "2.0")
            .with_latest("New", "1.0");
        let ctx = ActionContext {
            config: &config,
            repository: &repo,
            assume_yes: true,
        };
        let mut ui = MockUI::new();

        let result = InstallCommand::new(ctx, InstallArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(repo.is_installed("New"));
        assert!(ui.has_message("[outdated]"));
        assert!(!ui.has_success("Updated Old"));
    }
}
