//! Configuration loading and schema.
//!
//! - [`schema`] - Typed configuration structures
//! - [`loader`] - File discovery, parsing, validation

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config, validate, CONFIG_ENV_VAR};
pub use schema::{ModkeeperConfig, OutputMode, PowerShellSettings, Settings};
