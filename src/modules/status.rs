//! Module status types.
//!
//! A [`PackageStatus`] is derived, never stored: it is recomputed from the
//! package manager on every pass so callers always act on current truth.

use serde::Serialize;
use std::ops::Deref;

use super::target::TargetPackage;
use super::version::ModuleVersion;

/// Observed state of one target module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageStatus {
    pub name: String,
    pub description: String,
    pub is_installed: bool,
    pub installed_version: Option<ModuleVersion>,
    pub latest_version: Option<ModuleVersion>,
    pub needs_update: bool,
}

impl PackageStatus {
    /// Build a status from the two independent query answers.
    ///
    /// `needs_update` holds only when the module is installed, both
    /// versions are known, and the latest is strictly newer.
    pub fn from_versions(
        target: &TargetPackage,
        installed_version: Option<ModuleVersion>,
        latest_version: Option<ModuleVersion>,
    ) -> Self {
        let is_installed = installed_version.is_some();
        let needs_update = match (&installed_version, &latest_version) {
            (Some(installed), Some(latest)) => latest > installed,
            _ => false,
        };

        Self {
            name: target.name.clone(),
            description: target.description.clone(),
            is_installed,
            installed_version,
            latest_version,
            needs_update,
        }
    }

    /// Where this module sits in the reconciliation state machine.
    pub fn state(&self) -> PackageState {
        if !self.is_installed {
            PackageState::Absent
        } else if self.needs_update {
            PackageState::Stale
        } else {
            PackageState::Current
        }
    }
}

/// Per-module reconciliation state after a query pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageState {
    /// Not installed (or could not be queried).
    Absent,
    /// Installed and not known to be behind the registry.
    Current,
    /// Installed but older than the latest published version.
    Stale,
}

impl PackageState {
    /// Bracketed label for non-TTY output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "[missing]",
            Self::Current => "[ok]",
            Self::Stale => "[outdated]",
        }
    }
}

/// Statuses for every target, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSnapshot {
    statuses: Vec<PackageStatus>,
}

impl StatusSnapshot {
    /// Wrap statuses that are already in declaration order.
    pub fn new(statuses: Vec<PackageStatus>) -> Self {
        Self { statuses }
    }

    /// Modules that are not installed.
    pub fn missing(&self) -> Vec<&PackageStatus> {
        self.statuses.iter().filter(|s| !s.is_installed).collect()
    }

    /// Modules that are installed but behind the registry.
    pub fn outdated(&self) -> Vec<&PackageStatus> {
        self.statuses
            .iter()
            .filter(|s| s.is_installed && s.needs_update)
            .collect()
    }

    pub fn installed_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_installed).count()
    }

    pub fn current_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| s.state() == PackageState::Current)
            .count()
    }

    /// Every target is installed and none is behind.
    pub fn is_reconciled(&self) -> bool {
        self.current_count() == self.statuses.len()
    }

    /// Look up one module by name.
    pub fn get(&self, name: &str) -> Option<&PackageStatus> {
        self.statuses.iter().find(|s| s.name == name)
    }
}

impl Deref for StatusSnapshot {
    type Target = [PackageStatus];

    fn deref(&self) -> &Self::Target {
        &self.statuses
    }
}
