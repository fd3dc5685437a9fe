//! Fix command implementation.
//!
//! The `modkeeper fix` command updates outdated modules and then installs
//! missing ones, both from the same status snapshot.

use crate::cli::args::FixArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::reconcile::{run_action, Action, ActionContext};

/// The fix command implementation.
pub struct FixCommand<'a> {
    ctx: ActionContext<'a>,
    args: FixArgs,
}

impl<'a> FixCommand<'a> {
    /// Create a new fix command.
    pub fn new(ctx: ActionContext<'a>, args: FixArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for FixCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        run_action(Action::Fix, &self.ctx, &self.args.only, ui)
    }
}
