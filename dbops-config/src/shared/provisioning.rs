use serde::{Deserialize, Serialize};
use std::fmt;

/// How the operator writes resources to the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningMode {
    /// Get-or-create the namespace, then create the deployment.
    ///
    /// Provisioning the same database twice fails on the deployment name.
    #[default]
    Create,
    /// Server-side apply both the namespace and the deployment.
    ///
    /// Repeated runs converge on the same objects.
    Apply,
}

impl fmt::Display for ProvisioningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningMode::Create => f.write_str("create"),
            ProvisioningMode::Apply => f.write_str("apply"),
        }
    }
}

/// Provisioning behaviour settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProvisioningConfig {
    #[serde(default)]
    pub mode: ProvisioningMode,
}
