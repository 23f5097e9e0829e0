//! Provisioning strategies.
//!
//! A strategy turns one [`Database`] into cluster state: a namespace holding a
//! deployment that runs the store. Strategies keep no state between calls.

use async_trait::async_trait;
use dbops_config::shared::{ProvisioningMode, StoreConfig};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::database::Database;
use crate::k8s::{K8sClient, K8sError};
use crate::resources::{build_deployment, build_namespace};

/// Errors returned by [`Strategy::execute`].
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("failed to look up namespace `{namespace}`: {source}")]
    NamespaceLookup {
        namespace: String,
        #[source]
        source: K8sError,
    },

    #[error("failed to create namespace `{namespace}`: {source}")]
    NamespaceCreate {
        namespace: String,
        #[source]
        source: K8sError,
    },

    #[error("failed to apply namespace `{namespace}`: {source}")]
    NamespaceApply {
        namespace: String,
        #[source]
        source: K8sError,
    },

    #[error("failed to create deployment `{name}` in namespace `{namespace}`: {source}")]
    DeploymentCreate {
        namespace: String,
        name: String,
        #[source]
        source: K8sError,
    },

    #[error("failed to apply deployment `{name}` in namespace `{namespace}`: {source}")]
    DeploymentApply {
        namespace: String,
        name: String,
        #[source]
        source: K8sError,
    },
}

impl StrategyError {
    /// The Kubernetes error behind this failure.
    pub fn k8s_error(&self) -> &K8sError {
        match self {
            StrategyError::NamespaceLookup { source, .. }
            | StrategyError::NamespaceCreate { source, .. }
            | StrategyError::NamespaceApply { source, .. }
            | StrategyError::DeploymentCreate { source, .. }
            | StrategyError::DeploymentApply { source, .. } => source,
        }
    }
}

/// Inputs of a single [`Strategy::execute`] call.
#[derive(Debug, Clone)]
pub struct StrategyContext {
    pub database: Database,
}

impl StrategyContext {
    pub fn new(database: Database) -> StrategyContext {
        StrategyContext { database }
    }
}

/// Provisions the cluster objects backing a logical database.
#[async_trait]
pub trait Strategy: Send + Sync {
    async fn execute(&self, context: &StrategyContext) -> Result<(), StrategyError>;
}

/// Returns the strategy implementing `mode`.
pub fn build_strategy(
    mode: ProvisioningMode,
    client: Arc<dyn K8sClient>,
    store: StoreConfig,
) -> Box<dyn Strategy> {
    match mode {
        ProvisioningMode::Create => Box::new(CreateStrategy::new(client, store)),
        ProvisioningMode::Apply => Box::new(ApplyStrategy::new(client, store)),
    }
}

/// Get-or-create the namespace, then create the deployment.
///
/// The deployment is created unconditionally, so provisioning the same record
/// twice fails with [`K8sError::AlreadyExists`] on the second call. A
/// namespace created before a failed deployment create is left in place.
pub struct CreateStrategy {
    client: Arc<dyn K8sClient>,
    store: StoreConfig,
}

impl CreateStrategy {
    pub fn new(client: Arc<dyn K8sClient>, store: StoreConfig) -> CreateStrategy {
        CreateStrategy { client, store }
    }

    /// Makes sure the namespace exists.
    ///
    /// Only a not-found lookup leads to a create; any other lookup failure is
    /// returned as is. Losing a create race to another writer is fine since the
    /// namespace then exists.
    async fn ensure_namespace(&self, namespace: &str) -> Result<(), StrategyError> {
        match self.client.get_namespace(namespace).await {
            Ok(_) => {
                info!(namespace, "namespace already exists");
                return Ok(());
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => {
                error!(namespace, error = %err, "failed to look up namespace");
                return Err(StrategyError::NamespaceLookup {
                    namespace: namespace.to_owned(),
                    source: err,
                });
            }
        }

        match self.client.create_namespace(&build_namespace(namespace)).await {
            Ok(_) => {
                info!(namespace, "created namespace");
                Ok(())
            }
            Err(err) if err.is_already_exists() => {
                info!(namespace, "namespace was created concurrently");
                Ok(())
            }
            Err(err) => {
                error!(namespace, error = %err, "failed to create namespace");
                Err(StrategyError::NamespaceCreate {
                    namespace: namespace.to_owned(),
                    source: err,
                })
            }
        }
    }
}

#[async_trait]
impl Strategy for CreateStrategy {
    async fn execute(&self, context: &StrategyContext) -> Result<(), StrategyError> {
        let database = &context.database;

        self.ensure_namespace(&database.namespace).await?;

        let deployment = build_deployment(database, &self.store);
        if let Err(err) = self
            .client
            .create_deployment(&database.namespace, &deployment)
            .await
        {
            error!(
                namespace = %database.namespace,
                deployment = %database.name,
                error = %err,
                "failed to create deployment"
            );
            return Err(StrategyError::DeploymentCreate {
                namespace: database.namespace.clone(),
                name: database.name.clone(),
                source: err,
            });
        }

        info!(
            namespace = %database.namespace,
            deployment = %database.name,
            replicas = database.replicas,
            "created deployment"
        );

        Ok(())
    }
}

/// Server-side apply both the namespace and the deployment.
///
/// Repeated calls with the same record succeed and leave the objects matching
/// the record.
pub struct ApplyStrategy {
    client: Arc<dyn K8sClient>,
    store: StoreConfig,
}

impl ApplyStrategy {
    pub fn new(client: Arc<dyn K8sClient>, store: StoreConfig) -> ApplyStrategy {
        ApplyStrategy { client, store }
    }
}

#[async_trait]
impl Strategy for ApplyStrategy {
    async fn execute(&self, context: &StrategyContext) -> Result<(), StrategyError> {
        let database = &context.database;

        self.client
            .apply_namespace(&build_namespace(&database.namespace))
            .await
            .map_err(|err| {
                error!(namespace = %database.namespace, error = %err, "failed to apply namespace");
                StrategyError::NamespaceApply {
                    namespace: database.namespace.clone(),
                    source: err,
                }
            })?;

        let deployment = build_deployment(database, &self.store);
        self.client
            .apply_deployment(&database.namespace, &deployment)
            .await
            .map_err(|err| {
                error!(
                    namespace = %database.namespace,
                    deployment = %database.name,
                    error = %err,
                    "failed to apply deployment"
                );
                StrategyError::DeploymentApply {
                    namespace: database.namespace.clone(),
                    name: database.name.clone(),
                    source: err,
                }
            })?;

        info!(
            namespace = %database.namespace,
            deployment = %database.name,
            replicas = database.replicas,
            "applied deployment"
        );

        Ok(())
    }
}
