//! The package management collaborator seam.
//!
//! The reconciler talks to the module registry only through
//! [`ModuleRepository`]. Production code uses
//! [`PowerShellGallery`](super::gallery::PowerShellGallery); tests use
//! [`MockRepository`](super::mock::MockRepository).

use crate::error::Result;

use super::version::ModuleVersion;

/// Where an install lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallScope {
    /// Only for the invoking user, no elevation needed.
    CurrentUser,
    /// Machine-wide.
    AllUsers,
}

impl InstallScope {
    /// The value the package manager expects on its command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentUser => "CurrentUser",
            Self::AllUsers => "AllUsers",
        }
    }
}

/// Flags for a single install call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    /// Explicit scope, or the package manager's default when `None`.
    pub scope: Option<InstallScope>,
    /// Reinstall even when some version is already present.
    pub force: bool,
    /// Allow commands that collide with other installed modules.
    pub allow_clobber: bool,
}

impl InstallOptions {
    /// Idempotent, current-user, non-interactive install.
    pub fn primary() -> Self {
        Self {
            scope: Some(InstallScope::CurrentUser),
            force: true,
            allow_clobber: true,
        }
    }

    /// Plain forced reinstall, tried once after the primary install fails.
    pub fn fallback() -> Self {
        Self {
            scope: None,
            force: true,
            allow_clobber: false,
        }
    }
}

/// Queries and mutations against the module registry and the local
/// module store.
///
/// Every method blocks until the underlying operation finishes.
pub trait ModuleRepository {
    /// Highest locally installed version, or `None` when absent.
    fn installed_version(&self, name: &str) -> Result<Option<ModuleVersion>>;

    /// Every locally installed version. Several may live side by side.
    fn installed_versions(&self, name: &str) -> Result<Vec<ModuleVersion>>;

    /// Latest version published in the registry, or `None` when the
    /// module cannot be resolved there.
    fn latest_version(&self, name: &str) -> Result<Option<ModuleVersion>>;

    /// Install the module.
    fn install(&self, name: &str, options: &InstallOptions) -> Result<()>;

    /// Remove exactly one installed version.
    fn uninstall_version(&self, name: &str, version: &ModuleVersion) -> Result<()>;

    /// Remove every installed version.
    fn uninstall_all(&self, name: &str) -> Result<()>;
}
