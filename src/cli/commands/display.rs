//! Shared display helpers for module status and action results.
//!
//! Used by `check`, the mutating commands, and `connect` so that status
//! tables, counts, and per-module outcomes render the same everywhere.

use crate::config::ModkeeperConfig;
use crate::error::{ModkeeperError, Result};
use crate::modules::{
    InstallReport, ModuleVersion, PackageState, StatusSnapshot, TargetPackage, UpdateReport,
};
use crate::ui::{should_use_colors, ModkeeperTheme, Table, UserInterface};

/// Theme matching the current color settings.
pub fn theme() -> ModkeeperTheme {
    if should_use_colors() {
        ModkeeperTheme::new()
    } else {
        ModkeeperTheme::plain()
    }
}

/// Resolve `--only` names against the configured targets.
///
/// An empty list selects every target. Matching is case-insensitive and
/// the result keeps declaration order.
pub fn select_targets(config: &ModkeeperConfig, only: &[String]) -> Result<Vec<TargetPackage>> {
    if only.is_empty() {
        return Ok(config.targets.clone());
    }

    for name in only {
        if config.target(name).is_none() {
            return Err(ModkeeperError::UnknownModule { name: name.clone() });
        }
    }

    Ok(config
        .targets
        .iter()
        .filter(|t| only.iter().any(|n| t.name.eq_ignore_ascii_case(n)))
        .cloned()
        .collect())
}

/// Version text for tables: the version, or `-` when unknown.
pub fn version_text(version: Option<&ModuleVersion>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Build the status table for a snapshot.
pub fn status_table(snapshot: &StatusSnapshot, theme: &ModkeeperTheme, detail: bool) -> Table {
    let mut headers = vec!["Module", "Installed", "Latest", "Status"];
    if detail {
        headers.push("Description");
    }

    let mut table = Table::new(headers);
    for status in snapshot.iter() {
        let mut row = vec![
            status.name.clone(),
            version_text(status.installed_version.as_ref()),
            version_text(status.latest_version.as_ref()),
            theme.format_state(status.state()),
        ];
        if detail {
            row.push(theme.dim.apply_to(&status.description).to_string());
        }
        table.add_row(row);
    }
    table
}

/// Print the status table.
pub fn show_status(ui: &mut dyn UserInterface, snapshot: &StatusSnapshot) {
    let detail = ui.output_mode().shows_detail();
    let table = status_table(snapshot, &theme(), detail);
    for line in table.render().lines() {
        ui.message(line);
    }
}

/// Print the headline counts for a snapshot.
pub fn show_counts(ui: &mut dyn UserInterface, snapshot: &StatusSnapshot) {
    let total = snapshot.len();
    let missing = snapshot.missing().len();
    let outdated = snapshot.outdated().len();

    ui.message("");
    ui.message(&format!(
        "{} of {} modules installed, {} current",
        snapshot.installed_count(),
        total,
        snapshot.current_count()
    ));

    if snapshot.is_reconciled() {
        ui.success("All modules are installed and current");
        return;
    }
    if missing > 0 {
        ui.warning(&format!("{} missing", plural(missing, "module")));
    }
    if outdated > 0 {
        ui.warning(&format!("{} outdated", plural(outdated, "module")));
    }
}

/// Print one line per attempted install.
pub fn show_install_outcomes(ui: &mut dyn UserInterface, report: &InstallReport) {
    for outcome in &report.outcomes {
        match &outcome.error {
            None => ui.success(&format!("Installed {}", outcome.name)),
            Some(err) => ui.error(&format!("Failed to install {}: {}", outcome.name, err)),
        }
    }
}

/// Print one line per attempted update, plus any removal warnings.
pub fn show_update_outcomes(ui: &mut dyn UserInterface, report: &UpdateReport) {
    for outcome in &report.outcomes {
        for warning in &outcome.removal_warnings {
            ui.warning(warning);
        }
        match &outcome.error {
            None => ui.success(&format!(
                "Updated {} {} -> {}",
                outcome.name,
                version_text(outcome.from_version.as_ref()),
                version_text(outcome.to_version.as_ref())
            )),
            Some(err) => ui.error(&format!("Failed to update {}: {}", outcome.name, err)),
        }
    }
}

/// Names in `names` whose refreshed state is not one of `settled`.
pub fn unresolved<'a>(
    snapshot: &StatusSnapshot,
    names: &'a [String],
    settled: &[PackageState],
) -> Vec<&'a str> {
    names
        .iter()
        .filter(|name| {
            snapshot
                .get(name)
                .map(|s| !settled.contains(&s.state()))
                .unwrap_or(true)
        })
        .map(String::as_str)
        .collect()
}

/// `1 module`, `2 modules`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
