use serde::{Deserialize, Serialize};

/// Sentry error reporting configuration.
///
/// When present, the operator reports its top-level failure and any panic to
/// the given DSN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
}
