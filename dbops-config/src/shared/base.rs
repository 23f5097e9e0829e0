use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// An explicit Kubernetes endpoint was configured but is blank.
    #[error("`kubernetes.endpoint` cannot be empty when set")]
    EmptyEndpoint,
    /// Only one half of the client certificate/key pair was configured.
    #[error(
        "Invalid kubernetes config: `client_certificate_path` and `client_key_path` must be set together"
    )]
    IncompleteClientIdentity,
    /// Certificate paths were configured without an explicit endpoint.
    #[error("Invalid kubernetes config: certificate paths require `endpoint` to be set")]
    CertificatesWithoutEndpoint,
    /// The container image is blank.
    #[error("`store.image` cannot be empty")]
    EmptyImage,
    /// The container port is zero.
    #[error("`store.port` cannot be zero")]
    PortZero,
    /// The pod label key or value is blank.
    #[error("`store.app_label` cannot be empty")]
    EmptyAppLabel,
    /// The host volume root is not an absolute path.
    #[error("`store.volume_root` must be an absolute path, got `{0}`")]
    RelativeVolumeRoot(String),
}
