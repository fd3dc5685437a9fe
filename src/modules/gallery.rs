//! PowerShell module registry backend.
//!
//! [`PowerShellGallery`] answers [`ModuleRepository`] calls by running
//! PowerShellGet cmdlets in a non-interactive `pwsh` child process, one
//! process per call.

use tracing::debug;

use crate::config::PowerShellSettings;
use crate::error::{ModkeeperError, Result};
use crate::shell::{self, CommandOptions, CommandResult};

use super::repository::{InstallOptions, ModuleRepository};
use super::version::{extract_version, extract_versions, ModuleVersion};

/// Module repository backed by `pwsh` and PowerShellGet.
#[derive(Debug, Clone)]
pub struct PowerShellGallery {
    executable: String,
    repository: String,
    timeout: Option<u64>,
}

impl PowerShellGallery {
    /// Create a backend from configuration.
    pub fn new(settings: &PowerShellSettings) -> Self {
        Self {
            executable: settings.executable.clone(),
            repository: settings.repository.clone(),
            timeout: settings.timeout_secs,
        }
    }

    /// The `pwsh` executable this backend runs.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Whether the configured executable can be found.
    pub fn is_available(&self) -> bool {
        shell::find_executable(&self.executable).is_some()
    }

    fn invoke(&self, script: &str) -> Result<CommandResult> {
        let args = vec![
            "-NoLogo".to_string(),
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            script.to_string(),
        ];
        let mut options = CommandOptions {
            timeout: self.timeout,
            ..Default::default()
        };
        options
            .env
            .insert("POWERSHELL_TELEMETRY_OPTOUT".to_string(), "1".to_string());

        debug!("pwsh: {}", script);
        let result = shell::run(&self.executable, &args, &options)?;
        debug!(
            "pwsh exited with {:?} after {:?}",
            result.exit_code, result.duration
        );
        Ok(result)
    }

    fn query(&self, name: &str, script: &str) -> Result<String> {
        let result = self.invoke(script)?;
        if result.success {
            Ok(result.stdout)
        } else {
            Err(ModkeeperError::QueryUnavailable {
                module: name.to_string(),
                message: result.diagnostic(),
            })
        }
    }
}

impl ModuleRepository for PowerShellGallery {
    fn installed_version(&self, name: &str) -> Result<Option<ModuleVersion>> {
        let out = self.query(name, &installed_version_script(name))?;
        Ok(extract_version(&out))
    }

    fn installed_versions(&self, name: &str) -> Result<Vec<ModuleVersion>> {
        let out = self.query(name, &installed_versions_script(name))?;
        Ok(extract_versions(&out))
    }

    fn latest_version(&self, name: &str) -> Result<Option<ModuleVersion>> {
        let out = self.query(name, &latest_version_script(name, &self.repository))?;
        Ok(extract_version(&out))
    }

    fn install(&self, name: &str, options: &InstallOptions) -> Result<()> {
        let result = self.invoke(&install_script(name, &self.repository, options))?;
        if result.success {
            Ok(())
        } else {
            Err(ModkeeperError::InstallFailed {
                module: name.to_string(),
                message: result.diagnostic(),
            })
        }
    }

    fn uninstall_version(&self, name: &str, version: &ModuleVersion) -> Result<()> {
        let result = self.invoke(&uninstall_version_script(name, version))?;
        if result.success {
            Ok(())
        } else {
            Err(ModkeeperError::RemovalFailed {
                module: name.to_string(),
                version: version.to_string(),
                message: result.diagnostic(),
            })
        }
    }

    fn uninstall_all(&self, name: &str) -> Result<()> {
        let result = self.invoke(&uninstall_all_script(name))?;
        if result.success {
            Ok(())
        } else {
            Err(ModkeeperError::RemovalFailed {
                module: name.to_string(),
                version: "all".to_string(),
                message: result.diagnostic(),
            })
        }
    }
}

/// Quote a value as a PowerShell single-quoted literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// The install line an operator can paste to do by hand what `install` does.
pub fn manual_install_command(name: &str, repository: &str) -> String {
    install_script(name, repository, &InstallOptions::primary())
}

fn installed_version_script(name: &str) -> String {
    format!(
        "Get-Module -ListAvailable -Name {} | Sort-Object Version -Descending | \
         Select-Object -First 1 -ExpandProperty Version | ForEach-Object {{ $_.ToString() }}",
        quote_literal(name)
    )
}

fn installed_versions_script(name: &str) -> String {
    format!(
        "Get-InstalledModule -Name {} -AllVersions -ErrorAction SilentlyContinue | \
         ForEach-Object {{ $_.Version.ToString() }}",
        quote_literal(name)
    )
}

fn latest_version_script(name: &str, repository: &str) -> String {
    format!(
        "Find-Module -Name {} -Repository {} -ErrorAction SilentlyContinue | \
         Select-Object -ExpandProperty Version | ForEach-Object {{ $_.ToString() }}",
        quote_literal(name),
        quote_literal(repository)
    )
}

fn install_script(name: &str, repository: &str, options: &InstallOptions) -> String {
    let mut script = format!("Install-Module -Name {}", quote_literal(name));
    if let Some(scope) = options.scope {
        script.push_str(&format!(
            " -Repository {} -Scope {}",
            quote_literal(repository),
            scope.as_str()
        ));
    }
    if options.force {
        script.push_str(" -Force");
    }
    if options.allow_clobber {
        script.push_str(" -AllowClobber");
    }
    script.push_str(" -ErrorAction Stop");
    script
}

fn uninstall_version_script(name: &str, version: &ModuleVersion) -> String {
    format!(
        "Uninstall-Module -Name {} -RequiredVersion {} -Force -ErrorAction Stop",
        quote_literal(name),
        quote_literal(version.as_str())
    )
}

fn uninstall_all_script(name: &str) -> String {
    format!(
        "Uninstall-Module -Name {} -AllVersions -Force -ErrorAction SilentlyContinue",
        quote_literal(name)
    )
}
