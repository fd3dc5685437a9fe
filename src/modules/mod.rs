//! Target module reconciliation.
//!
//! This module decides which declared modules are missing or outdated and
//! drives corrective actions through a package manager.
//!
//! # Modules
//!
//! - [`target`] - Declared target modules and the built-in catalog
//! - [`version`] - Version parsing and numeric ordering
//! - [`status`] - Per-module status derived from queries
//! - [`repository`] - The package manager trait
//! - [`gallery`] - `pwsh`-backed package manager
//! - [`reconciler`] - Status computation, install, update, fix-everything
//! - [`report`] - Per-module action outcomes
//! - [`mock`] - In-memory package manager for tests

pub mod gallery;
pub mod mock;
pub mod reconciler;
pub mod report;
pub mod repository;
pub mod status;
pub mod target;
pub mod version;

pub use gallery::{manual_install_command, PowerShellGallery};
pub use mock::{MockRepository, RepositoryCall};
pub use reconciler::Reconciler;
pub use report::{InstallOutcome, InstallReport, ReconcileReport, UpdateOutcome, UpdateReport};
pub use repository::{InstallOptions, InstallScope, ModuleRepository};
pub use status::{PackageState, PackageStatus, StatusSnapshot};
pub use target::{default_targets, TargetPackage};
pub use version::ModuleVersion;
