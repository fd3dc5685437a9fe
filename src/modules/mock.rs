//! In-memory module repository for testing.
//!
//! `MockRepository` implements [`ModuleRepository`] over a table of
//! installed and published versions, records every call in order, and can
//! be told to fail specific operations.
//!
//! # Example
//!
//! ```
//! use modkeeper::modules::{MockRepository, Reconciler, TargetPackage};
//!
//! let repo = MockRepository::new()
//!     .with_installed("Az", &["11.0.0"])
//!     .with_latest("Az", "12.1.0");
//! let reconciler = Reconciler::new(&repo);
//!
//! let snapshot = reconciler.compute_status(&[TargetPackage::new("Az", "Azure")]);
//! assert!(snapshot[0].needs_update);
//!
//! let report = reconciler.update_outdated(&snapshot);
//! assert!(report.success());
//! assert!(repo.is_installed("Az"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::error::{ModkeeperError, Result};

use super::repository::{InstallOptions, ModuleRepository};
use super::version::ModuleVersion;

/// A call made against the mock, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    InstalledVersion(String),
    InstalledVersions(String),
    LatestVersion(String),
    Install { name: String, options: InstallOptions },
    UninstallVersion { name: String, version: String },
    UninstallAll(String),
}

#[derive(Debug, Default)]
struct State {
    installed: HashMap<String, Vec<ModuleVersion>>,
    calls: Vec<RepositoryCall>,
}

/// Mock repository implementation for testing.
#[derive(Debug, Default)]
pub struct MockRepository {
    state: RefCell<State>,
    latest: HashMap<String, ModuleVersion>,
    failing_queries: HashSet<String>,
    failing_installs: HashMap<String, Option<InstallOptions>>,
    failing_uninstall_version: HashSet<String>,
    failing_uninstall_all: HashSet<String>,
    dropped_installs: HashSet<String>,
}

impl MockRepository {
    /// Create an empty repository: nothing installed, nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark versions of a module as installed side by side.
    pub fn with_installed(self, name: &str, versions: &[&str]) -> Self {
        let parsed = versions.iter().map(|v| parse(v)).collect();
        self.state
            .borrow_mut()
            .installed
            .insert(name.to_string(), parsed);
        self
    }

    /// Publish a latest version for a module.
    pub fn with_latest(mut self, name: &str, version: &str) -> Self {
        self.latest.insert(name.to_string(), parse(version));
        self
    }

    /// Every query for this module returns an error.
    pub fn fail_queries_for(mut self, name: &str) -> Self {
        self.failing_queries.insert(name.to_string());
        self
    }

    /// Every install of this module fails.
    pub fn fail_install(mut self, name: &str) -> Self {
        self.failing_installs.insert(name.to_string(), None);
        self
    }

    /// Installs of this module fail only when called with `options`.
    pub fn fail_install_with(mut self, name: &str, options: &InstallOptions) -> Self {
        self.failing_installs
            .insert(name.to_string(), Some(options.clone()));
        self
    }

    /// Exact-version removals of this module fail.
    pub fn fail_uninstall_version(mut self, name: &str) -> Self {
        self.failing_uninstall_version.insert(name.to_string());
        self
    }

    /// Remove-all sweeps of this module fail.
    pub fn fail_uninstall_all(mut self, name: &str) -> Self {
        self.failing_uninstall_all.insert(name.to_string());
        self
    }

    /// Installs of this module report success but change nothing.
    pub fn silently_drop_install(mut self, name: &str) -> Self {
        self.dropped_installs.insert(name.to_string());
        self
    }

    /// All calls so far.
    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls (installed state is kept).
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Whether any version of the module is currently installed.
    pub fn is_installed(&self, name: &str) -> bool {
        self.state
            .borrow()
            .installed
            .get(name)
            .is_some_and(|v| !v.is_empty())
    }

    fn record(&self, call: RepositoryCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn check_query(&self, name: &str) -> Result<()> {
        if self.failing_queries.contains(name) {
            return Err(ModkeeperError::QueryUnavailable {
                module: name.to_string(),
                message: "repository unreachable".to_string(),
            });
        }
        Ok(())
    }
}

fn parse(version: &str) -> ModuleVersion {
    version
        .parse()
        .unwrap_or_else(|e| panic!("invalid mock version: {}", e))
}

impl ModuleRepository for MockRepository {
    fn installed_version(&self, name: &str) -> Result<Option<ModuleVersion>> {
        self.record(RepositoryCall::InstalledVersion(name.to_string()));
        self.check_query(name)?;
        Ok(self
            .state
            .borrow()
            .installed
            .get(name)
            .and_then(|versions| versions.iter().max().cloned()))
    }

    fn installed_versions(&self, name: &str) -> Result<Vec<ModuleVersion>> {
        self.record(RepositoryCall::InstalledVersions(name.to_string()));
        self.check_query(name)?;
        Ok(self
            .state
            .borrow()
            .installed
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn latest_version(&self, name: &str) -> Result<Option<ModuleVersion>> {
        self.record(RepositoryCall::LatestVersion(name.to_string()));
        self.check_query(name)?;
        Ok(self.latest.get(name).cloned())
    }

    fn install(&self, name: &str, options: &InstallOptions) -> Result<()> {
        self.record(RepositoryCall::Install {
            name: name.to_string(),
            options: options.clone(),
        });

        let fails = match self.failing_installs.get(name) {
            Some(None) => true,
            Some(Some(only)) => only == options,
            None => false,
        };
        if fails {
            return Err(ModkeeperError::InstallFailed {
                module: name.to_string(),
                message: "install rejected".to_string(),
            });
        }

        let Some(latest) = self.latest.get(name) else {
            return Err(ModkeeperError::InstallFailed {
                module: name.to_string(),
                message: "No match was found for the specified search criteria".to_string(),
            });
        };

        if !self.dropped_installs.contains(name) {
            let mut state = self.state.borrow_mut();
            let versions = state.installed.entry(name.to_string()).or_default();
            if !versions.contains(latest) {
                versions.push(latest.clone());
            }
        }
        Ok(())
    }

    fn uninstall_version(&self, name: &str, version: &ModuleVersion) -> Result<()> {
        self.record(RepositoryCall::UninstallVersion {
            name: name.to_string(),
            version: version.to_string(),
        });

        let removal_error = |message: &str| ModkeeperError::RemovalFailed {
            module: name.to_string(),
            version: version.to_string(),
            message: message.to_string(),
        };

        if self.failing_uninstall_version.contains(name) {
            return Err(removal_error("module is in use"));
        }

        let mut state = self.state.borrow_mut();
        let versions = state.installed.entry(name.to_string()).or_default();
        let before = versions.len();
        versions.retain(|v| v != version);
        if versions.len() == before {
            return Err(removal_error("version not installed"));
        }
        Ok(())
    }

    fn uninstall_all(&self, name: &str) -> Result<()> {
        self.record(RepositoryCall::UninstallAll(name.to_string()));
        if self.failing_uninstall_all.contains(name) {
            return Err(ModkeeperError::RemovalFailed {
                module: name.to_string(),
                version: "all".to_string(),
                message: "sweep failed".to_string(),
            });
        }
        self.state.borrow_mut().installed.remove(name);
        Ok(())
    }
}
