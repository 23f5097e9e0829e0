use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

const DEFAULT_IMAGE: &str = "krooney/redis:7.0.2";
const DEFAULT_CONTAINER_NAME: &str = "db";
const DEFAULT_PORT: u16 = 6379;
const DEFAULT_COMMAND: &str = "redis-server";
const DEFAULT_APP_LABEL: &str = "redis";
const DEFAULT_VOLUME_NAME: &str = "redis";
const DEFAULT_VOLUME_ROOT: &str = "/var/lib/redis";
const DEFAULT_DATA_MOUNT_PATH: &str = "/data";
const DEFAULT_REPLICAS: u16 = 1;

/// Shape of the key-value store workload created for every logical database.
///
/// Every field has a default so a configuration file only needs to list the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct StoreConfig {
    /// Container image running the store.
    pub image: String,
    /// Name of the single container in the pod.
    pub container_name: String,
    /// Port the store listens on inside the container.
    pub port: u16,
    /// Command used to start the store.
    pub command: Vec<String>,
    /// Value of the `app` label shared by the pod template and the selector.
    pub app_label: String,
    /// Name of the host-path volume.
    pub volume_name: String,
    /// Host directory under which each database gets `<namespace>/<name>`.
    pub volume_root: String,
    /// Where the host-path volume is mounted in the container.
    pub data_mount_path: String,
    /// Replica count assigned to newly created databases.
    pub replicas: u16,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image.trim().is_empty() {
            return Err(ValidationError::EmptyImage);
        }

        if self.port == 0 {
            return Err(ValidationError::PortZero);
        }

        if self.app_label.trim().is_empty() {
            return Err(ValidationError::EmptyAppLabel);
        }

        if !Path::new(&self.volume_root).is_absolute() {
            return Err(ValidationError::RelativeVolumeRoot(
                self.volume_root.clone(),
            ));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_owned(),
            container_name: DEFAULT_CONTAINER_NAME.to_owned(),
            port: DEFAULT_PORT,
            command: vec![DEFAULT_COMMAND.to_owned()],
            app_label: DEFAULT_APP_LABEL.to_owned(),
            volume_name: DEFAULT_VOLUME_NAME.to_owned(),
            volume_root: DEFAULT_VOLUME_ROOT.to_owned(),
            data_mount_path: DEFAULT_DATA_MOUNT_PATH.to_owned(),
            replicas: DEFAULT_REPLICAS,
        }
    }
}
