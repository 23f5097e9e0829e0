use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Scheme assumed for endpoints configured as a bare `host:port`.
const DEFAULT_ENDPOINT_SCHEME: &str = "https://";

/// Default timeout for establishing a connection to the API server.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default timeout for reading a response from the API server.
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Kubernetes API server.
///
/// When [`KubernetesConfig::endpoint`] is unset the ambient configuration is
/// used instead (in-cluster service account or the local kubeconfig).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KubernetesConfig {
    /// API server URL, e.g. `https://192.168.49.2:8443`.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Path to the PEM-encoded client certificate.
    #[serde(default)]
    pub client_certificate_path: Option<String>,
    /// Path to the PEM-encoded client private key.
    #[serde(default)]
    pub client_key_path: Option<String>,
    /// Path to the PEM-encoded certificate authority bundle used to verify the API server.
    #[serde(default)]
    pub certificate_authority_path: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl KubernetesConfig {
    /// Returns the configured endpoint with a scheme, if an endpoint is set.
    ///
    /// Endpoints given as `host:port` are assumed to be served over TLS.
    pub fn cluster_url(&self) -> Option<String> {
        let endpoint = self.endpoint.as_deref()?.trim();
        if endpoint.contains("://") {
            Some(endpoint.to_owned())
        } else {
            Some(format!("{DEFAULT_ENDPOINT_SCHEME}{endpoint}"))
        }
    }

    /// Validates the connection settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = &self.endpoint
            && endpoint.trim().is_empty()
        {
            return Err(ValidationError::EmptyEndpoint);
        }

        if self.client_certificate_path.is_some() != self.client_key_path.is_some() {
            return Err(ValidationError::IncompleteClientIdentity);
        }

        let has_certificates =
            self.client_certificate_path.is_some() || self.certificate_authority_path.is_some();
        if has_certificates && self.endpoint.is_none() {
            return Err(ValidationError::CertificatesWithoutEndpoint);
        }

        Ok(())
    }
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            client_certificate_path: None,
            client_key_path: None,
            certificate_authority_path: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_read_timeout_secs() -> u64 {
    DEFAULT_READ_TIMEOUT_SECS
}
