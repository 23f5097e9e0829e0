use serde::{Deserialize, Serialize};

const DEFAULT_ACCOUNT_NAME: &str = "DBOps";
const DEFAULT_ACCOUNT_EMAIL: &str = "development@dbops.com";

/// Owner details attached to the account created on each run.
///
/// The account id itself is generated at runtime and is not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AccountConfig {
    pub name: String,
    pub email: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ACCOUNT_NAME.to_owned(),
            email: DEFAULT_ACCOUNT_EMAIL.to_owned(),
        }
    }
}
