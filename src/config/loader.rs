//! Configuration file discovery and loading.
//!
//! Lookup order (first hit wins, no merging):
//! 1. `--config <path>` on the command line
//! 2. `MODKEEPER_CONFIG` environment variable
//! 3. `<config dir>/modkeeper/config.yml` (e.g. `~/.config/modkeeper/config.yml`)
//! 4. Built-in defaults

use crate::config::schema::ModkeeperConfig;
use crate::error::{ModkeeperError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "MODKEEPER_CONFIG";

/// Path of the per-user config file, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("modkeeper").join("config.yml"))
}

/// Decide which config file to read, if any.
///
/// An explicit path (flag or environment) is returned even when it does
/// not exist so that loading reports it; the per-user file is returned
/// only when present.
pub fn discover_config_path(
    explicit: Option<&Path>,
    env_value: Option<&str>,
    user_path: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    user_path.filter(|p| p.exists())
}

/// Load a single config file and parse it into ModkeeperConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
/// Returns `ConfigValidationError` if the targets are malformed.
pub fn load_config_file(path: &Path) -> Result<ModkeeperConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ModkeeperError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ModkeeperError::Io(e)
        }
    })?;

    let config = parse_config(&content, path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse YAML content into ModkeeperConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ModkeeperConfig> {
    if content.trim().is_empty() {
        return Ok(ModkeeperConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ModkeeperError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Check the invariants the rest of the program relies on.
pub fn validate(config: &ModkeeperConfig) -> Result<()> {
    if config.targets.is_empty() {
        return Err(ModkeeperError::ConfigValidationError {
            message: "at least one target module is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        let name = target.name.trim();
        if name.is_empty() {
            return Err(ModkeeperError::ConfigValidationError {
                message: "target module name cannot be empty".to_string(),
            });
        }
        if name != target.name {
            return Err(ModkeeperError::ConfigValidationError {
                message: format!(
                    "target module name '{}' has surrounding whitespace",
                    target.name
                ),
            });
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(ModkeeperError::ConfigValidationError {
                message: format!("duplicate target module '{}'", name),
            });
        }
    }

    if config.powershell.executable.trim().is_empty() {
        return Err(ModkeeperError::ConfigValidationError {
            message: "powershell.executable cannot be empty".to_string(),
        });
    }

    Ok(())
}

/// Load config with optional path override, falling back to defaults.
pub fn load_config(config_override: Option<&Path>) -> Result<ModkeeperConfig> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    match discover_config_path(config_override, env_value.as_deref(), user_config_path()) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)
        }
        None => {
            tracing::debug!("No config file found, using built-in targets");
            Ok(ModkeeperConfig::default())
        }
    }
}
