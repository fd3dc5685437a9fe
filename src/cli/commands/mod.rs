//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`modkeeper check`, `modkeeper fix`)
//! - One repository and configuration shared by every command
//! - Consistent global flag handling

pub mod check;
pub mod completions;
pub mod connect;
pub mod dispatcher;
pub mod display;
pub mod fix;
pub mod install;
pub mod reconcile;
pub mod update;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use reconcile::{run_action, Action, ActionContext};
