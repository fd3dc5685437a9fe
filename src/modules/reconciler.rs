//! Module reconciliation.
//!
//! The [`Reconciler`] compares the declared targets against what the
//! package manager reports and drives corrective installs and updates.
//! It is strictly sequential, works in declaration order, and never
//! prompts: confirmation belongs to the caller.
//!
//! Updates are destructive replacements. Every installed version is
//! removed before a fresh install, because in-place upgrades of these
//! modules leave conflicting parallel versions behind.

use tracing::{debug, info, warn};

use super::repository::{InstallOptions, ModuleRepository};
use super::report::{InstallOutcome, InstallReport, ReconcileReport, UpdateOutcome, UpdateReport};
use super::status::{PackageStatus, StatusSnapshot};
use super::target::TargetPackage;
use super::version::ModuleVersion;

/// Drives status queries and corrective actions through a repository.
pub struct Reconciler<'a> {
    repository: &'a dyn ModuleRepository,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over the given repository.
    pub fn new(repository: &'a dyn ModuleRepository) -> Self {
        Self { repository }
    }

    /// Query installed and latest versions for every target.
    ///
    /// A failed query is reported as "absent" or "unknown", never as an
    /// error. The result keeps declaration order.
    pub fn compute_status(&self, targets: &[TargetPackage]) -> StatusSnapshot {
        let statuses = targets
            .iter()
            .map(|target| {
                let installed = self
                    .repository
                    .installed_version(&target.name)
                    .unwrap_or_else(|e| {
                        debug!("Installed version of {} unavailable: {}", target.name, e);
                        None
                    });
                let latest = self
                    .repository
                    .latest_version(&target.name)
                    .unwrap_or_else(|e| {
                        debug!("Latest version of {} unavailable: {}", target.name, e);
                        None
                    });
                PackageStatus::from_versions(target, installed, latest)
            })
            .collect();

        StatusSnapshot::new(statuses)
    }

    /// Install every module the snapshot reports as not installed.
    ///
    /// A failed install is recorded and the pass moves on to the next
    /// module.
    pub fn install_missing(&self, statuses: &[PackageStatus]) -> InstallReport {
        let missing: Vec<&PackageStatus> = statuses.iter().filter(|s| !s.is_installed).collect();
        if missing.is_empty() {
            debug!("No missing modules");
            return InstallReport::nothing_to_do();
        }

        let outcomes = missing
            .into_iter()
            .map(|status| {
                info!("Installing {}", status.name);
                match self
                    .repository
                    .install(&status.name, &InstallOptions::primary())
                {
                    Ok(()) => InstallOutcome {
                        name: status.name.clone(),
                        success: true,
                        error: None,
                    },
                    Err(e) => {
                        warn!("Install of {} failed: {}", status.name, e);
                        InstallOutcome {
                            name: status.name.clone(),
                            success: false,
                            error: Some(e.to_string()),
                        }
                    }
                }
            })
            .collect();

        InstallReport { outcomes }
    }

    /// Replace every installed-but-outdated module with a fresh install.
    pub fn update_outdated(&self, statuses: &[PackageStatus]) -> UpdateReport {
        let outdated: Vec<&PackageStatus> = statuses
            .iter()
            .filter(|s| s.is_installed && s.needs_update)
            .collect();
        if outdated.is_empty() {
            debug!("No outdated modules");
            return UpdateReport::nothing_to_do();
        }

        let outcomes = outdated
            .into_iter()
            .map(|status| self.replace(status))
            .collect();

        UpdateReport { outcomes }
    }

    /// Update outdated modules, then install missing ones, both from the
    /// same snapshot.
    pub fn reconcile_all(&self, statuses: &[PackageStatus]) -> ReconcileReport {
        let nothing_outdated = !statuses.iter().any(|s| s.is_installed && s.needs_update);
        let nothing_missing = statuses.iter().all(|s| s.is_installed);
        if nothing_outdated && nothing_missing {
            debug!("All modules installed and current");
            return ReconcileReport::nothing_to_do();
        }

        let updates = self.update_outdated(statuses);
        let installs = self.install_missing(statuses);
        ReconcileReport { updates, installs }
    }

    fn replace(&self, status: &PackageStatus) -> UpdateOutcome {
        let name = status.name.as_str();
        info!(
            "Replacing {} {} with {}",
            name,
            display_version(status.installed_version.as_ref()),
            display_version(status.latest_version.as_ref())
        );

        let removal_warnings = self.remove_all_versions(status);

        let install_error = match self.repository.install(name, &InstallOptions::primary()) {
            Ok(()) => None,
            Err(primary) => {
                warn!("Install of {} failed, retrying plain reinstall: {}", name, primary);
                self.repository
                    .install(name, &InstallOptions::fallback())
                    .err()
                    .map(|fallback| fallback.to_string())
            }
        };

        let to_version = self.repository.installed_version(name).unwrap_or_else(|e| {
            debug!("Could not confirm installed version of {}: {}", name, e);
            None
        });

        UpdateOutcome {
            name: name.to_string(),
            from_version: status.installed_version.clone(),
            to_version,
            success: install_error.is_none(),
            error: install_error,
            removal_warnings,
        }
    }

    /// Remove each installed version; fall back to a silent remove-all
    /// sweep the first time an exact-version removal fails.
    fn remove_all_versions(&self, status: &PackageStatus) -> Vec<String> {
        let name = status.name.as_str();
        let versions = match self.repository.installed_versions(name) {
            Ok(versions) if !versions.is_empty() => versions,
            Ok(_) => status.installed_version.iter().cloned().collect(),
            Err(e) => {
                debug!("Could not enumerate versions of {}: {}", name, e);
                status.installed_version.iter().cloned().collect()
            }
        };

        let mut warnings = Vec::new();
        let mut swept = false;
        for version in &versions {
            debug!("Removing {} {}", name, version);
            if let Err(e) = self.repository.uninstall_version(name, version) {
                warn!("Removal of {} {} failed: {}", name, version, e);
                warnings.push(e.to_string());
                if !swept {
                    swept = true;
                    if let Err(sweep) = self.repository.uninstall_all(name) {
                        debug!("Best-effort removal sweep of {} failed: {}", name, sweep);
                    }
                }
            }
        }
        warnings
    }
}

fn display_version(version: Option<&ModuleVersion>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::mock::{MockRepository, RepositoryCall};

    fn targets(names: &[&str]) -> Vec<TargetPackage> {
        names
            .iter()
            .map(|n| TargetPackage::new(*n, format!("{} module", n)))
            .collect()
    }

    #[test]
    fn compute_status_keeps_declaration_order() {
        let repo = MockRepository::new()
            .with_installed("C", &["1.0.0"])
            .with_latest("A", "1.0.0");
        let reconciler = Reconciler::new(&repo);

        let snapshot = reconciler.compute_status(&targets(&["C", "A", "B"]));
        let names: Vec<_> = snapshot.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn compute_status_treats_query_failures_as_absent() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0")
            .fail_queries_for("A");
        let reconciler = Reconciler::new(&repo);

        let snapshot = reconciler.compute_status(&targets(&["A"]));
        let status = &snapshot[0];
        assert!(!status.is_installed);
        assert!(status.installed_version.is_none());
        assert!(status.latest_version.is_none());
        assert!(!status.needs_update);
    }

    #[test]
    fn compute_status_unpublished_module_is_current_when_installed() {
        let repo = MockRepository::new().with_installed("A", &["1.0.0"]);
        let reconciler = Reconciler::new(&repo);

        let snapshot = reconciler.compute_status(&targets(&["A"]));
        assert!(snapshot[0].is_installed);
        assert!(snapshot[0].latest_version.is_none());
        assert!(!snapshot[0].needs_update);
    }

    #[test]
    fn install_missing_with_nothing_missing_makes_no_calls() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        let report = reconciler.install_missing(&snapshot);
        assert!(report.is_nothing_to_do());
        assert!(report.success());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn install_missing_continues_after_failure() {
        let repo = MockRepository::new()
            .with_latest("A", "1.0.0")
            .with_latest("B", "2.0.0")
            .with_latest("C", "3.0.0")
            .fail_install("B");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A", "B", "C"]));

        let report = reconciler.install_missing(&snapshot);
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].success);
        assert!(!report.outcomes[1].success);
        assert!(report.outcomes[1].error.is_some());
        assert!(report.outcomes[2].success);
        assert!(repo.is_installed("A"));
        assert!(!repo.is_installed("B"));
        assert!(repo.is_installed("C"));
    }

    #[test]
    fn install_missing_uses_primary_options() {
        let repo = MockRepository::new().with_latest("A", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        reconciler.install_missing(&snapshot);
        assert_eq!(
            repo.calls(),
            vec![RepositoryCall::Install {
                name: "A".into(),
                options: InstallOptions::primary(),
            }]
        );
    }

    #[test]
    fn install_missing_skips_installed_modules() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0")
            .with_latest("B", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A", "B"]));

        let report = reconciler.install_missing(&snapshot);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].name, "B");
    }

    #[test]
    fn update_outdated_with_nothing_outdated_makes_no_calls() {
        let repo = MockRepository::new()
            .with_installed("A", &["2.0.0"])
            .with_latest("A", "2.0.0")
            .with_latest("B", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A", "B"]));
        repo.clear_calls();

        let report = reconciler.update_outdated(&snapshot);
        assert!(report.is_nothing_to_do());
        assert!(report.success());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn update_removes_every_version_then_installs() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0", "1.5.0"])
            .with_latest("A", "2.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        let report = reconciler.update_outdated(&snapshot);
        assert!(report.success());
        let outcome = &report.outcomes[0];
        assert_eq!(outcome.from_version, Some("1.5.0".parse().unwrap()));
        assert_eq!(outcome.to_version, Some("2.0.0".parse().unwrap()));

        let calls = repo.calls();
        assert_eq!(calls[0], RepositoryCall::InstalledVersions("A".into()));
        assert_eq!(
            calls[1],
            RepositoryCall::UninstallVersion {
                name: "A".into(),
                version: "1.0.0".into(),
            }
        );
        assert_eq!(
            calls[2],
            RepositoryCall::UninstallVersion {
                name: "A".into(),
                version: "1.5.0".into(),
            }
        );
        assert!(matches!(calls[3], RepositoryCall::Install { .. }));
        assert_eq!(calls[4], RepositoryCall::InstalledVersion("A".into()));
        assert!(!calls.iter().any(|c| matches!(c, RepositoryCall::UninstallAll(_))));
    }

    #[test]
    fn update_then_status_reports_current() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0");
        let reconciler = Reconciler::new(&repo);
        let before = reconciler.compute_status(&targets(&["A"]));

        let report = reconciler.update_outdated(&before);
        assert!(report.success());

        let after = reconciler.compute_status(&targets(&["A"]));
        assert!(after[0].is_installed);
        assert!(!after[0].needs_update);
    }

    #[test]
    fn removal_failure_falls_back_to_sweep_and_still_installs() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0")
            .fail_uninstall_version("A")
            .fail_uninstall_all("A");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        let report = reconciler.update_outdated(&snapshot);
        let outcome = &report.outcomes[0];
        assert!(outcome.success);
        assert_eq!(outcome.removal_warnings.len(), 1);

        let calls = repo.calls();
        let sweep = calls
            .iter()
            .position(|c| matches!(c, RepositoryCall::UninstallAll(_)))
            .unwrap();
        let install = calls
            .iter()
            .position(|c| matches!(c, RepositoryCall::Install { .. }))
            .unwrap();
        assert!(sweep < install);
    }

    #[test]
    fn sweep_runs_once_per_module() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0", "1.1.0", "1.2.0"])
            .with_latest("A", "2.0.0")
            .fail_uninstall_version("A");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        reconciler.update_outdated(&snapshot);
        let sweeps = repo
            .calls()
            .iter()
            .filter(|c| matches!(c, RepositoryCall::UninstallAll(_)))
            .count();
        assert_eq!(sweeps, 1);
    }

    #[test]
    fn primary_install_failure_retries_with_fallback() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0")
            .fail_install_with("A", &InstallOptions::primary());
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        let report = reconciler.update_outdated(&snapshot);
        assert!(report.success());
        assert_eq!(report.outcomes[0].to_version, Some("2.0.0".parse().unwrap()));

        let installs: Vec<_> = repo
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                RepositoryCall::Install { options, .. } => Some(options),
                _ => None,
            })
            .collect();
        assert_eq!(
            installs,
            vec![InstallOptions::primary(), InstallOptions::fallback()]
        );
    }

    #[test]
    fn both_install_attempts_failing_is_reported_and_others_proceed() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0")
            .with_installed("C", &["1.0.0"])
            .with_latest("C", "1.1.0")
            .fail_install("C");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["C", "A"]));

        let report = reconciler.update_outdated(&snapshot);
        let c = &report.outcomes[0];
        let a = &report.outcomes[1];
        assert_eq!(c.name, "C");
        assert!(!c.success);
        assert!(c.error.is_some());
        assert!(c.to_version.is_none());
        assert!(a.success);
        assert_eq!(a.to_version, Some("2.0.0".parse().unwrap()));
    }

    #[test]
    fn reconcile_all_nothing_to_do() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.clear_calls();

        let report = reconciler.reconcile_all(&snapshot);
        assert!(report.is_nothing_to_do());
        assert!(report.success());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn reconcile_all_updates_before_installs() {
        // B is declared first but missing; A is outdated.
        let repo = MockRepository::new()
            .with_latest("B", "3.0.0")
            .with_installed("A", &["1.0.0"])
            .with_latest("A", "2.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["B", "A"]));
        repo.clear_calls();

        reconciler.reconcile_all(&snapshot);
        let installs: Vec<String> = repo
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                RepositoryCall::Install { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(installs, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn reconcile_all_worked_example() {
        let repo = MockRepository::new()
            .with_installed("A", &["1.0"])
            .with_latest("A", "2.0")
            .with_latest("B", "3.0");
        let reconciler = Reconciler::new(&repo);
        let all = targets(&["A", "B"]);
        let snapshot = reconciler.compute_status(&all);

        let report = reconciler.reconcile_all(&snapshot);
        assert!(report.success());
        let update = &report.updates.outcomes[0];
        assert_eq!(update.name, "A");
        assert_eq!(update.from_version, Some("1.0".parse().unwrap()));
        assert_eq!(update.to_version, Some("2.0".parse().unwrap()));
        assert_eq!(report.installs.outcomes[0].name, "B");

        let after = reconciler.compute_status(&all);
        assert_eq!(after[0].installed_version, Some("2.0".parse().unwrap()));
        assert!(!after[0].needs_update);
        assert_eq!(after[1].installed_version, Some("3.0".parse().unwrap()));
        assert!(!after[1].needs_update);
        assert!(after.is_reconciled());
    }

    #[test]
    fn reconcile_all_uses_snapshot_not_live_state() {
        // The snapshot says A is missing; even though it gets installed
        // by someone else before the pass runs, install is still attempted.
        let repo = MockRepository::new().with_latest("A", "1.0.0");
        let reconciler = Reconciler::new(&repo);
        let snapshot = reconciler.compute_status(&targets(&["A"]));
        repo.install("A", &InstallOptions::primary()).unwrap();
        repo.clear_calls();

        let report = reconciler.reconcile_all(&snapshot);
        assert_eq!(report.installs.outcomes.len(), 1);
    }

    #[test]
    fn claimed_install_that_does_not_stick_shows_missing_on_refresh() {
        let repo = MockRepository::new()
            .with_latest("A", "1.0.0")
            .silently_drop_install("A");
        let reconciler = Reconciler::new(&repo);
        let all = targets(&["A"]);
        let snapshot = reconciler.compute_status(&all);

        let report = reconciler.install_missing(&snapshot);
        assert!(report.success());

        let after = reconciler.compute_status(&all);
        assert!(!after[0].is_installed);
    }
}
