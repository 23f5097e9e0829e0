use serde::{Deserialize, Serialize};

use crate::Config;
use crate::shared::{
    AccountConfig, KubernetesConfig, ProvisioningConfig, SentryConfig, StoreConfig,
    ValidationError,
};

/// Complete configuration for the operator binary.
///
/// Loaded once at startup and passed explicitly to the client factory and the
/// provisioning strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperatorConfig {
    /// How to reach the Kubernetes API server.
    #[serde(default)]
    pub kubernetes: KubernetesConfig,
    /// Workload shape for each provisioned store.
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub account: AccountConfig,
    /// Optional Sentry configuration for error tracking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentry: Option<SentryConfig>,
}

impl OperatorConfig {
    /// Validates every section of the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.kubernetes.validate()?;
        self.store.validate()
    }
}

impl Config for OperatorConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["store.command"];
}
