use dbops_config::shared::AccountConfig;
use std::fmt;
use uuid::Uuid;

/// A logical key-value store instance to provision.
///
/// Records are built by the entry point for a single run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Name of the backing deployment. Unique per namespace.
    pub name: String,
    /// Namespace holding the deployment.
    pub namespace: String,
    pub replicas: u16,
}

impl Database {
    /// Creates a record with a freshly generated name in `namespace`.
    pub fn new(namespace: impl Into<String>, replicas: u16) -> Database {
        Database {
            name: generate_database_name(),
            namespace: namespace.into(),
            replicas,
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Random decimal name, which is always a valid DNS-1123 label.
fn generate_database_name() -> String {
    rand::random::<u64>().to_string()
}

/// The owner on whose behalf databases are provisioned.
///
/// Its id doubles as the namespace for the owner's databases.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Account {
    /// Creates an account with a new random id.
    pub fn new(config: &AccountConfig) -> Account {
        Account {
            id: Uuid::new_v4().to_string(),
            name: config.name.clone(),
            email: config.email.clone(),
        }
    }
}
