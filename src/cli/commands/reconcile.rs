//! Shared flow for the commands that change installed modules.
//!
//! `install`, `update` and `fix` all follow the same steps: query status,
//! show the pending work, confirm, act, then query again and judge the
//! result by what the package manager reports now.

use crate::config::ModkeeperConfig;
use crate::error::Result;
use crate::modules::{ModuleRepository, PackageState, PackageStatus, Reconciler, StatusSnapshot};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::CommandResult;
use super::display;

/// Which corrective pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Install missing modules.
    Install,
    /// Replace outdated modules.
    Update,
    /// Update outdated modules, then install missing ones.
    Fix,
}

impl Action {
    /// Prompt key, also used for `MODKEEPER_PROMPT_<KEY>` overrides.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Update => "update",
            Self::Fix => "fix",
        }
    }

    /// Updates remove modules first, so they are not confirmed by default.
    pub fn default_answer(&self) -> bool {
        matches!(self, Self::Install)
    }

    fn pending<'s>(&self, snapshot: &'s StatusSnapshot) -> Vec<&'s PackageStatus> {
        match self {
            Self::Install => snapshot.missing(),
            Self::Update => snapshot.outdated(),
            Self::Fix => {
                let mut pending = snapshot.outdated();
                pending.extend(snapshot.missing());
                pending
            }
        }
    }

    fn settled(&self) -> &'static [PackageState] {
        match self {
            Self::Install => &[PackageState::Current, PackageState::Stale],
            Self::Update | Self::Fix => &[PackageState::Current],
        }
    }

    fn removes_modules(&self, pending: &[&PackageStatus]) -> bool {
        !matches!(self, Self::Install) && pending.iter().any(|s| s.is_installed)
    }

    fn nothing_to_do(&self) -> &'static str {
        match self {
            Self::Install => "All modules are installed",
            Self::Update => "All installed modules are current",
            Self::Fix => "All modules are installed and current",
        }
    }

    fn question(&self, count: usize) -> String {
        let modules = display::plural(count, "module");
        match self {
            Self::Install => format!("Install {}?", modules),
            Self::Update => format!("Update {}?", modules),
            Self::Fix => format!("Fix {}?", modules),
        }
    }
}

/// Everything a mutating command needs besides its arguments.
pub struct ActionContext<'a> {
    pub config: &'a ModkeeperConfig,
    pub repository: &'a dyn ModuleRepository,
    /// Skip the confirmation prompt.
    pub assume_yes: bool,
}

/// Run one corrective pass over the selected targets.
pub fn run_action(
    action: Action,
    ctx: &ActionContext<'_>,
    only: &[String],
    ui: &mut dyn UserInterface,
) -> Result<CommandResult> {
    let targets = display::select_targets(ctx.config, only)?;
    let reconciler = Reconciler::new(ctx.repository);

    let mut spinner = ui.start_spinner(&format!(
        "Checking {}...",
        display::plural(targets.len(), "module")
    ));
    let snapshot = reconciler.compute_status(&targets);
    spinner.finish_success(&format!(
        "Checked {}",
        display::plural(targets.len(), "module")
    ));

    let pending = action.pending(&snapshot);
    if pending.is_empty() {
        ui.success(action.nothing_to_do());
        return Ok(CommandResult::success());
    }

    ui.show_header("Pending changes");
    let theme = display::theme();
    for status in &pending {
        let detail = match status.state() {
            PackageState::Stale => format!(
                "{} -> {}",
                display::version_text(status.installed_version.as_ref()),
                display::version_text(status.latest_version.as_ref())
            ),
            _ => display::version_text(status.latest_version.as_ref()),
        };
        ui.message(&format!(
            "  {} {} {}",
            theme.format_state(status.state()),
            status.name,
            theme.dim.apply_to(detail)
        ));
    }
    if action.removes_modules(&pending) {
        ui.warning("Updating removes every installed version of a module before reinstalling it");
    }

    let prompt = Prompt::confirm(
        action.key(),
        action.question(pending.len()),
        action.default_answer(),
    );
    if !ctx.assume_yes && !ui.confirm(&prompt)? {
        ui.message("No changes made.");
        if !ui.is_interactive() {
            ui.show_hint(&format!(
                "Re-run with --yes or set MODKEEPER_PROMPT_{}=yes",
                action.key().to_uppercase()
            ));
        }
        return Ok(CommandResult::success());
    }

    let acted_on: Vec<String> = pending.iter().map(|s| s.name.clone()).collect();
    let mut spinner = ui.start_spinner(&format!(
        "Working on {}...",
        display::plural(acted_on.len(), "module")
    ));
    let (updates, installs) = match action {
        Action::Install => (None, Some(reconciler.install_missing(&snapshot))),
        Action::Update => (Some(reconciler.update_outdated(&snapshot)), None),
        Action::Fix => {
            let report = reconciler.reconcile_all(&snapshot);
            (Some(report.updates), Some(report.installs))
        }
    };
    let failures = updates.as_ref().map_or(0, |r| r.failures().count())
        + installs.as_ref().map_or(0, |r| r.failures().count());
    if failures == 0 {
        spinner.finish_success("Package manager calls finished");
    } else {
        spinner.finish_error(&format!(
            "{} reported a failure",
            display::plural(failures, "module")
        ));
    }

    if let Some(report) = &updates {
        display::show_update_outcomes(ui, report);
    }
    if let Some(report) = &installs {
        display::show_install_outcomes(ui, report);
    }

    // Counts come from a fresh query, not from what the calls claimed.
    let refreshed = reconciler.compute_status(&targets);
    ui.show_header("Module status");
    display::show_status(ui, &refreshed);
    display::show_counts(ui, &refreshed);

    let unresolved = display::unresolved(&refreshed, &acted_on, action.settled());
    if !unresolved.is_empty() {
        ui.error(&format!("Not resolved: {}", unresolved.join(", ")));
    }

    if failures > 0 || !unresolved.is_empty() {
        return Ok(CommandResult::failure(1));
    }
    if installs.is_some_and(|r| !r.is_nothing_to_do()) {
        ui.show_hint("Run `modkeeper connect` for connection commands");
    }
    Ok(CommandResult::success())
}
