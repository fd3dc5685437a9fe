//! Update command implementation.
//!
//! The `modkeeper update` command replaces every outdated module: all
//! installed versions are removed, then the latest is installed.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::reconcile::{run_action, Action, ActionContext};

/// The update command implementation.
pub struct UpdateCommand<'a> {
    ctx: ActionContext<'a>,
    args: UpdateArgs,
}

impl<'a> UpdateCommand<'a> {
    /// Create a new update command.
    pub fn new(ctx: ActionContext<'a>, args: UpdateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for UpdateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        run_action(Action::Update, &self.ctx, &self.args.only, ui)
    }
}
