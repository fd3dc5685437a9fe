//! Modkeeper - Keep cloud-administration PowerShell modules installed and current.
//!
//! Modkeeper compares a declared list of PowerShell modules against what
//! the local PowerShell Gallery client reports, then installs what is
//! missing and replaces what is outdated.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`modules`] - Status computation, reconciliation, and repositories
//! - [`shell`] - External command execution
//! - [`ui`] - Confirmation prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use modkeeper::modules::{MockRepository, Reconciler, TargetPackage};
//!
//! let repo = MockRepository::new().with_latest("MicrosoftTeams", "6.5.0");
//! let reconciler = Reconciler::new(&repo);
//! let targets = vec![TargetPackage::new("MicrosoftTeams", "Teams administration")];
//!
//! let snapshot = reconciler.compute_status(&targets);
//! assert_eq!(snapshot.missing().len(), 1);
//!
//! let report = reconciler.reconcile_all(&snapshot);
//! assert!(report.success());
//! assert!(reconciler.compute_status(&targets).is_reconciled());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod modules;
pub mod shell;
pub mod ui;

pub use error::{ModkeeperError, Result};
