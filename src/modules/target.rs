//! Declared target modules.

use serde::{Deserialize, Serialize};

/// A module the workstation is expected to have installed.
///
/// Identity is the module name; two targets with the same name are the
/// same target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPackage {
    /// Registry name of the module (e.g. `ExchangeOnlineManagement`).
    pub name: String,

    /// Short human description.
    #[serde(default)]
    pub description: String,

    /// Command an operator pastes to open a session with this module.
    #[serde(default, rename = "connect", skip_serializing_if = "Option::is_none")]
    pub connect_hint: Option<String>,
}

impl TargetPackage {
    /// Create a target without a connection hint.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            connect_hint: None,
        }
    }

    /// Attach a connection hint.
    pub fn with_connect_hint(mut self, hint: impl Into<String>) -> Self {
        self.connect_hint = Some(hint.into());
        self
    }
}

/// The built-in catalog of cloud-administration modules.
pub fn default_targets() -> Vec<TargetPackage> {
    vec![
        TargetPackage::new("ExchangeOnlineManagement", "Exchange Online administration")
            .with_connect_hint(
                "Connect-ExchangeOnline -UserPrincipalName <admin@tenant.onmicrosoft.com>",
            ),
        TargetPackage::new("Microsoft.Graph", "Microsoft Graph SDK (Entra ID, users, groups)")
            .with_connect_hint(
                "Connect-MgGraph -Scopes \"User.Read.All\",\"Group.ReadWrite.All\"",
            ),
        TargetPackage::new("MicrosoftTeams", "Microsoft Teams administration")
            .with_connect_hint("Connect-MicrosoftTeams"),
        TargetPackage::new(
            "Microsoft.Online.SharePoint.PowerShell",
            "SharePoint Online administration",
        )
        .with_connect_hint("Connect-SPOService -Url https://<tenant>-admin.sharepoint.com"),
        TargetPackage::new("Az", "Azure Resource Manager")
            .with_connect_hint("Connect-AzAccount"),
    ]
}
