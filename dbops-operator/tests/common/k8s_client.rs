use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dbops_operator::k8s::{DEPLOYMENT_KIND, K8sClient, K8sError, NAMESPACE_KIND};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Namespace;
use kube::core::ErrorResponse;

/// A call received by [`InMemoryK8sClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetNamespace(String),
    CreateNamespace(String),
    ApplyNamespace(String),
    GetDeployment(String, String),
    CreateDeployment(String, String),
    ApplyDeployment(String, String),
}

/// Failure to inject into a call.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Forbidden,
    Unavailable,
    Invalid,
}

impl Failure {
    fn into_error(self, kind: &'static str, name: &str) -> K8sError {
        let (code, reason) = match self {
            Failure::Forbidden => (403, "Forbidden"),
            Failure::Unavailable => (503, "ServiceUnavailable"),
            Failure::Invalid => (422, "Invalid"),
        };
        let error = kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: format!("{kind} {name}: {reason}"),
            reason: reason.to_owned(),
            code,
        });

        K8sError::from_kube(kind, name, error)
    }
}

#[derive(Default)]
struct ClusterState {
    namespaces: BTreeMap<String, Namespace>,
    deployments: BTreeMap<(String, String), Deployment>,
    calls: Vec<Call>,
    namespace_lookup_failure: Option<Failure>,
    namespace_create_failure: Option<Failure>,
    deployment_create_failure: Option<Failure>,
}

/// A [`K8sClient`] keeping objects in memory.
///
/// Mirrors the API server rules the strategies rely on: gets of missing
/// objects are not found, creates of existing names conflict, and deployments
/// can only be created in existing namespaces.
#[derive(Default)]
pub struct InMemoryK8sClient {
    state: Mutex<ClusterState>,
}

impl InMemoryK8sClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a namespace without recording a call.
    pub fn seed_namespace(&self, name: &str) {
        let namespace = dbops_operator::resources::build_namespace(name);
        self.state
            .lock()
            .unwrap()
            .namespaces
            .insert(name.to_owned(), namespace);
    }

    pub fn fail_namespace_lookup(&self, failure: Failure) {
        self.state.lock().unwrap().namespace_lookup_failure = Some(failure);
    }

    pub fn fail_namespace_create(&self, failure: Failure) {
        self.state.lock().unwrap().namespace_create_failure = Some(failure);
    }

    pub fn fail_deployment_create(&self, failure: Failure) {
        self.state.lock().unwrap().deployment_create_failure = Some(failure);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn namespace_exists(&self, name: &str) -> bool {
        self.state.lock().unwrap().namespaces.contains_key(name)
    }

    pub fn deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.state
            .lock()
            .unwrap()
            .deployments
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
    }

    pub fn deployment_count(&self) -> usize {
        self.state.lock().unwrap().deployments.len()
    }
}

fn name_of(kind: &'static str, name: &Option<String>) -> Result<String, K8sError> {
    name.clone().ok_or(K8sError::MissingName { kind })
}

#[async_trait]
impl K8sClient for InMemoryK8sClient {
    async fn get_namespace(&self, name: &str) -> Result<Namespace, K8sError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::GetNamespace(name.to_owned()));

        if let Some(failure) = state.namespace_lookup_failure {
            return Err(failure.into_error(NAMESPACE_KIND, name));
        }

        state
            .namespaces
            .get(name)
            .cloned()
            .ok_or_else(|| K8sError::NotFound {
                kind: NAMESPACE_KIND,
                name: name.to_owned(),
            })
    }

    async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace, K8sError> {
        let name = name_of(NAMESPACE_KIND, &namespace.metadata.name)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateNamespace(name.clone()));

        if let Some(failure) = state.namespace_create_failure {
            return Err(failure.into_error(NAMESPACE_KIND, &name));
        }

        if state.namespaces.contains_key(&name) {
            return Err(K8sError::AlreadyExists {
                kind: NAMESPACE_KIND,
                name,
            });
        }

        state.namespaces.insert(name, namespace.clone());

        Ok(namespace.clone())
    }

    async fn apply_namespace(&self, namespace: &Namespace) -> Result<Namespace, K8sError> {
        let name = name_of(NAMESPACE_KIND, &namespace.metadata.name)?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ApplyNamespace(name.clone()));

        state.namespaces.insert(name, namespace.clone());

        Ok(namespace.clone())
    }

    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Deployment, K8sError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::GetDeployment(namespace.to_owned(), name.to_owned()));

        state
            .deployments
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| K8sError::NotFound {
                kind: DEPLOYMENT_KIND,
                name: name.to_owned(),
            })
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, K8sError> {
        let name = name_of(DEPLOYMENT_KIND, &deployment.metadata.name)?;
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::CreateDeployment(namespace.to_owned(), name.clone()));

        if let Some(failure) = state.deployment_create_failure {
            return Err(failure.into_error(DEPLOYMENT_KIND, &name));
        }

        if !state.namespaces.contains_key(namespace) {
            return Err(K8sError::NotFound {
                kind: NAMESPACE_KIND,
                name: namespace.to_owned(),
            });
        }

        let key = (namespace.to_owned(), name.clone());
        if state.deployments.contains_key(&key) {
            return Err(K8sError::AlreadyExists {
                kind: DEPLOYMENT_KIND,
                name,
            });
        }

        state.deployments.insert(key, deployment.clone());

        Ok(deployment.clone())
    }

    async fn apply_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, K8sError> {
        let name = name_of(DEPLOYMENT_KIND, &deployment.metadata.name)?;
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::ApplyDeployment(namespace.to_owned(), name.clone()));

        if !state.namespaces.contains_key(namespace) {
            return Err(K8sError::NotFound {
                kind: NAMESPACE_KIND,
                name: namespace.to_owned(),
            });
        }

        state
            .deployments
            .insert((namespace.to_owned(), name), deployment.clone());

        Ok(deployment.clone())
    }
}
