//! Configuration schema types.
//!
//! ```yaml
//! targets:
//!   - name: ExchangeOnlineManagement
//!     description: Exchange Online administration
//!     connect: Connect-ExchangeOnline
//! powershell:
//!   executable: pwsh
//!   repository: PSGallery
//!   timeout_secs: 900
//! settings:
//!   default_output: normal
//! ```

use serde::{Deserialize, Serialize};

use crate::modules::{default_targets, TargetPackage};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModkeeperConfig {
    /// Modules to keep installed, in display and action order.
    pub targets: Vec<TargetPackage>,

    /// How to reach the package manager.
    pub powershell: PowerShellSettings,

    /// Front-end settings.
    pub settings: Settings,
}

impl Default for ModkeeperConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            powershell: PowerShellSettings::default(),
            settings: Settings::default(),
        }
    }
}

impl ModkeeperConfig {
    /// Look up a target by name (case-insensitive, like PowerShell).
    pub fn target(&self, name: &str) -> Option<&TargetPackage> {
        self.targets
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Package manager invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerShellSettings {
    /// `pwsh` executable name or path.
    pub executable: String,

    /// Registry to query and install from.
    pub repository: String,

    /// Kill a single package manager call after this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for PowerShellSettings {
    fn default() -> Self {
        Self {
            executable: "pwsh".to_string(),
            repository: "PSGallery".to_string(),
            timeout_secs: Some(900),
        }
    }
}

/// Front-end settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output mode: verbose, normal, quiet, silent
    pub default_output: OutputMode,
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ModkeeperConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ModkeeperConfig::default());
        assert_eq!(config.targets.len(), 5);
    }

    #[test]
    fn targets_replace_builtin_catalog() {
        let yaml = r#"
targets:
  - name: PnP.PowerShell
    description: SharePoint PnP
"#;
        let config: ModkeeperConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].name, "PnP.PowerShell");
        assert_eq!(config.powershell.executable, "pwsh");
    }

    #[test]
    fn powershell_settings_partial_override() {
        let yaml = r#"
powershell:
  executable: /usr/local/bin/pwsh
"#;
        let config: ModkeeperConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.powershell.executable, "/usr/local/bin/pwsh");
        assert_eq!(config.powershell.repository, "PSGallery");
        assert_eq!(config.powershell.timeout_secs, Some(900));
    }

    #[test]
    fn output_mode_parses_lowercase() {
        let yaml = "settings:\n  default_output: quiet\n";
        let config: ModkeeperConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.settings.default_output, OutputMode::Quiet);
    }

    #[test]
    fn target_lookup_is_case_insensitive() {
        let config = ModkeeperConfig::default();
        assert!(config.target("microsoftteams").is_some());
        assert!(config.target("NotThere").is_none());
    }
}
