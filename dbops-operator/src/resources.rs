//! Builders translating a [`Database`] into Kubernetes objects.
//!
//! Every function here is pure: the same record and store configuration always
//! produce the same objects.

use dbops_config::shared::StoreConfig;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, HostPathVolumeSource, Namespace, PodSpec, PodTemplateSpec, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;
use std::path::Path;

use crate::database::Database;

/// Label key shared by the pod template and the deployment selector.
pub const APP_LABEL_KEY: &str = "app";

const ROLLING_UPDATE_STRATEGY: &str = "RollingUpdate";
const IMAGE_PULL_POLICY: &str = "IfNotPresent";
const HOST_PATH_DIRECTORY_OR_CREATE: &str = "DirectoryOrCreate";

/// Builds a [`Namespace`] named `name`.
pub fn build_namespace(name: &str) -> Namespace {
    Namespace {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            ..ObjectMeta::default()
        },
        ..Namespace::default()
    }
}

/// Labels identifying the store pods.
///
/// Used both as the pod template labels and as the selector, which the API
/// server requires to match.
///
/// The pair is the same for every database, so deployments sharing an
/// account namespace have overlapping selectors.
pub fn database_labels(store: &StoreConfig) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL_KEY.to_owned(), store.app_label.clone())])
}

/// Host directory dedicated to `database`: `<volume_root>/<namespace>/<name>`.
pub fn database_volume_path(database: &Database, store: &StoreConfig) -> String {
    Path::new(&store.volume_root)
        .join(&database.namespace)
        .join(&database.name)
        .to_string_lossy()
        .into_owned()
}

/// Builds the [`Deployment`] running the store for `database`.
pub fn build_deployment(database: &Database, store: &StoreConfig) -> Deployment {
    let labels = database_labels(store);

    let container = Container {
        name: store.container_name.clone(),
        image: Some(store.image.clone()),
        image_pull_policy: Some(IMAGE_PULL_POLICY.to_owned()),
        command: Some(store.command.clone()),
        ports: Some(vec![ContainerPort {
            container_port: i32::from(store.port),
            ..ContainerPort::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: store.volume_name.clone(),
            mount_path: store.data_mount_path.clone(),
            ..VolumeMount::default()
        }]),
        ..Container::default()
    };

    let volume = Volume {
        name: store.volume_name.clone(),
        host_path: Some(HostPathVolumeSource {
            path: database_volume_path(database, store),
            type_: Some(HOST_PATH_DIRECTORY_OR_CREATE.to_owned()),
        }),
        ..Volume::default()
    };

    Deployment {
        metadata: ObjectMeta {
            name: Some(database.name.clone()),
            namespace: Some(database.namespace.clone()),
            ..ObjectMeta::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(i32::from(database.replicas)),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..LabelSelector::default()
            },
            strategy: Some(DeploymentStrategy {
                type_: Some(ROLLING_UPDATE_STRATEGY.to_owned()),
                ..DeploymentStrategy::default()
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..ObjectMeta::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![volume]),
                    ..PodSpec::default()
                }),
            },
            ..DeploymentSpec::default()
        }),
        ..Deployment::default()
    }
}
