//! Per-module outcomes of reconciliation actions.
//!
//! These record what each action call *claimed*. Front ends take their
//! final counts from a fresh status query instead.

use serde::Serialize;

use super::version::ModuleVersion;

/// Result of installing one missing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOutcome {
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of replacing one outdated module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub name: String,
    pub from_version: Option<ModuleVersion>,
    /// Installed version re-queried after the reinstall.
    pub to_version: Option<ModuleVersion>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Exact-version removals that failed; the update carried on anyway.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removal_warnings: Vec<String>,
}

/// Outcome of an install-missing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<InstallOutcome>,
}

impl InstallReport {
    /// A pass that found nothing missing.
    pub fn nothing_to_do() -> Self {
        Self::default()
    }

    pub fn is_nothing_to_do(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when every attempted install reported success.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// Outcome of an update-outdated pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub outcomes: Vec<UpdateOutcome>,
}

impl UpdateReport {
    /// A pass that found nothing outdated.
    pub fn nothing_to_do() -> Self {
        Self::default()
    }

    pub fn is_nothing_to_do(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when every attempted update reported success.
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &UpdateOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }
}

/// Combined outcome of a fix-everything pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub updates: UpdateReport,
    pub installs: InstallReport,
}

impl ReconcileReport {
    /// A pass that found nothing outdated and nothing missing.
    pub fn nothing_to_do() -> Self {
        Self::default()
    }

    pub fn is_nothing_to_do(&self) -> bool {
        self.updates.is_nothing_to_do() && self.installs.is_nothing_to_do()
    }

    pub fn success(&self) -> bool {
        self.updates.success() && self.installs.success()
    }
}
