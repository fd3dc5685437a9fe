//! Check command implementation.
//!
//! The `modkeeper check` command shows which modules are missing or
//! outdated. It never changes anything and always exits 0.

use crate::cli::args::CheckArgs;
use crate::config::ModkeeperConfig;
use crate::error::{ModkeeperError, Result};
use crate::modules::{ModuleRepository, Reconciler};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The check command implementation.
pub struct CheckCommand<'a> {
    config: &'a ModkeeperConfig,
    repository: &'a dyn ModuleRepository,
    args: CheckArgs,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    pub fn new(
        config: &'a ModkeeperConfig,
        repository: &'a dyn ModuleRepository,
        args: CheckArgs,
    ) -> Self {
        Self {
            config,
            repository,
            args,
        }
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let reconciler = Reconciler::new(self.repository);
        let total = self.config.targets.len();

        if self.args.json {
            let snapshot = reconciler.compute_status(&self.config.targets);
            let json = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| ModkeeperError::Other(e.into()))?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let mut spinner = ui.start_spinner(&format!(
            "Checking {}...",
            display::plural(total, "module")
        ));
        let snapshot = reconciler.compute_status(&self.config.targets);
        spinner.finish_success(&format!("Checked {}", display::plural(total, "module")));

        ui.show_header("Module status");
        display::show_status(ui, &snapshot);
        display::show_counts(ui, &snapshot);

        match (snapshot.missing().is_empty(), snapshot.outdated().is_empty()) {
            (true, true) => {}
            (false, true) => ui.show_hint("Run `modkeeper install` to install missing modules"),
            (true, false) => ui.show_hint("Run `modkeeper update` to update outdated modules"),
            (false, false) => ui.show_hint("Run `modkeeper fix` to update and install everything"),
        }

        Ok(CommandResult::success())
    }
}
