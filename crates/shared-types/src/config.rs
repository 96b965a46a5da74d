use serde::{Deserialize, Serialize};

/// Client configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Origin of the blood-bank API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Keys and location used to persist the session between launches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_user_key")]
    pub user_key: String,
    /// Directory for the file-backed store on native targets.
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_key: default_token_key(),
            user_key: default_user_key(),
            dir: default_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_user_key() -> String {
    "user".to_string()
}

fn default_dir() -> String {
    ".bloodbank".to_string()
}

impl ClientConfig {
    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}
