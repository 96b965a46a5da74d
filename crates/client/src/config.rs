use shared_types::ClientConfig;
use std::sync::OnceLock;

static CONFIG: OnceLock<ClientConfig> = OnceLock::new();
static DEFAULT: OnceLock<ClientConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "config.toml";

/// Environment variable overriding `api.base_url` on native builds.
pub const API_URL_ENV: &str = "BLOODBANK_API_URL";

/// Parse a config file body. Unparseable input falls back to defaults.
pub fn parse_config(contents: &str) -> ClientConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to parse config; using defaults");
        ClientConfig::default()
    })
}

/// Apply an API URL override if one is set and non-empty.
pub fn apply_api_override(config: &mut ClientConfig, override_url: Option<String>) {
    if let Some(url) = override_url.filter(|u| !u.trim().is_empty()) {
        tracing::info!(base_url = %url, "API URL overridden from environment");
        config.api.base_url = url.trim().to_string();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_config() -> ClientConfig {
    let mut config = match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => parse_config(&contents),
        Err(e) => {
            tracing::warn!(path = CONFIG_PATH, error = %e, "config file not found; using defaults");
            ClientConfig::default()
        }
    };
    dotenvy::dotenv().ok();
    apply_api_override(&mut config, std::env::var(API_URL_ENV).ok());
    config
}

#[cfg(target_arch = "wasm32")]
fn read_config() -> ClientConfig {
    parse_config(include_str!("../../../config.toml"))
}

/// Load the configuration once. Later calls return the same value.
pub fn load_config() -> &'static ClientConfig {
    CONFIG.get_or_init(|| {
        let config = read_config();
        tracing::info!(base_url = %config.api.base_url, "client configuration loaded");
        config
    })
}

/// The loaded configuration, or defaults if [`load_config`] has not run.
pub fn config() -> &'static ClientConfig {
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(ClientConfig::default))
}
