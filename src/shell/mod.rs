//! External command execution and environment detection.

pub mod command;
pub mod platform;

pub use command::{display_command, run, CommandOptions, CommandResult};
pub use platform::{find_executable, is_ci};
