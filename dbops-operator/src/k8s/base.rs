use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Namespace;
use std::io;
use thiserror::Error;

/// Kind name used in errors and logs for namespaces.
pub const NAMESPACE_KIND: &str = "Namespace";

/// Kind name used in errors and logs for deployments.
pub const DEPLOYMENT_KIND: &str = "Deployment";

/// Errors emitted by the Kubernetes integration.
///
/// API failures are classified by status code so callers can tell a missing
/// object apart from a permission problem or an unreachable API server.
#[derive(Debug, Error)]
pub enum K8sError {
    /// The object does not exist (HTTP 404).
    #[error("{kind} `{name}` was not found")]
    NotFound { kind: &'static str, name: String },

    /// An object with the same name already exists (HTTP 409).
    #[error("{kind} `{name}` already exists")]
    AlreadyExists { kind: &'static str, name: String },

    /// The credentials are not allowed to perform the call (HTTP 401/403).
    #[error("access to {kind} `{name}` was denied: {message}")]
    Forbidden {
        kind: &'static str,
        name: String,
        message: String,
    },

    /// The API server could not serve the call (HTTP 429/5xx or transport failure).
    #[error("the api server is unavailable while handling {kind} `{name}`: {source}")]
    Unavailable {
        kind: &'static str,
        name: String,
        #[source]
        source: kube::Error,
    },

    /// An object was submitted without `metadata.name`.
    #[error("the {kind} has no name")]
    MissingName { kind: &'static str },

    /// The configured endpoint is not a valid URL.
    #[error("the kubernetes endpoint `{0}` is not a valid url")]
    InvalidEndpoint(String),

    /// The certificate authority bundle could not be loaded.
    #[error("failed to load the certificate authority from `{path}`: {source}")]
    CertificateAuthority {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The client certificate or key could not be loaded.
    #[error("failed to load the client identity from `{path}`: {source}")]
    ClientIdentity {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Any other error returned by the [`kube`] client.
    #[error("An error occurred with kube when dealing with K8s: {0}")]
    Kube(#[from] kube::Error),
}

impl K8sError {
    /// Classifies a [`kube::Error`] raised while handling the `kind` object `name`.
    pub fn from_kube(kind: &'static str, name: &str, error: kube::Error) -> K8sError {
        let name = name.to_owned();

        if let kube::Error::Api(response) = &error {
            let code = response.code;
            let message = response.message.clone();

            return match code {
                404 => K8sError::NotFound { kind, name },
                409 => K8sError::AlreadyExists { kind, name },
                401 | 403 => K8sError::Forbidden {
                    kind,
                    name,
                    message,
                },
                429 | 500..=599 => K8sError::Unavailable {
                    kind,
                    name,
                    source: error,
                },
                _ => K8sError::Kube(error),
            };
        }

        match error {
            kube::Error::HyperError(_) | kube::Error::Service(_) => K8sError::Unavailable {
                kind,
                name,
                source: error,
            },
            error => K8sError::Kube(error),
        }
    }

    /// Returns `true` when the object is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, K8sError::NotFound { .. })
    }

    /// Returns `true` when the object already exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, K8sError::AlreadyExists { .. })
    }
}

/// Client interface describing the Kubernetes operations used by the operator.
///
/// `create_*` calls fail with [`K8sError::AlreadyExists`] on a name conflict,
/// while `apply_*` calls issue server-side apply patches and converge on the
/// submitted object.
#[async_trait]
pub trait K8sClient: Send + Sync {
    /// Retrieves the named [`Namespace`].
    async fn get_namespace(&self, name: &str) -> Result<Namespace, K8sError>;

    /// Creates a [`Namespace`].
    async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, K8sError>;

    /// Creates or updates a [`Namespace`].
    async fn apply_namespace(&self, namespace: &Namespace) -> Result<Namespace, K8sError>;

    /// Retrieves the named [`Deployment`] from `namespace`.
    async fn get_deployment(&self, namespace: &str, name: &str)
    -> Result<Deployment, K8sError>;

    /// Creates a [`Deployment`] in `namespace`.
    ///
    /// The namespace must already exist.
    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, K8sError>;

    /// Creates or updates a [`Deployment`] in `namespace`.
    async fn apply_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, K8sError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: format!("request failed: {reason}"),
            reason: reason.to_owned(),
            code,
        })
    }

    #[test]
    fn not_found_is_classified() {
        let err = K8sError::from_kube(NAMESPACE_KIND, "ns1", api_error(404, "NotFound"));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Namespace `ns1` was not found");
    }

    #[test]
    fn conflict_is_classified_as_already_exists() {
        let err = K8sError::from_kube(DEPLOYMENT_KIND, "db1", api_error(409, "AlreadyExists"));
        assert!(err.is_already_exists());
        assert_eq!(err.to_string(), "Deployment `db1` already exists");
    }

    #[test]
    fn permission_errors_are_not_treated_as_missing() {
        for code in [401, 403] {
            let err = K8sError::from_kube(NAMESPACE_KIND, "ns1", api_error(code, "Forbidden"));
            assert!(!err.is_not_found());
            match err {
                K8sError::Forbidden { kind, name, message } => {
                    assert_eq!(kind, NAMESPACE_KIND);
                    assert_eq!(name, "ns1");
                    assert_eq!(message, "request failed: Forbidden");
                }
                other => panic!("expected forbidden, got {other:?}"),
            }
        }
    }

    #[test]
    fn server_errors_are_unavailable() {
        for code in [429, 500, 503] {
            let err = K8sError::from_kube(NAMESPACE_KIND, "ns1", api_error(code, "Unavailable"));
            assert!(matches!(err, K8sError::Unavailable { .. }));
        }
    }

    #[test]
    fn other_status_codes_are_kept_as_kube_errors() {
        let err = K8sError::from_kube(DEPLOYMENT_KIND, "db1", api_error(422, "Invalid"));
        assert!(matches!(err, K8sError::Kube(kube::Error::Api(_))));
    }
}
