//! Configuration loading for lexchat.
//!
//! Reads `config.toml` from the data directory (`~/.lexchat/` by default),
//! falls back to defaults when the file is missing or malformed, and then
//! applies environment overrides. The endpoint credential only ever comes
//! from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use lexchat_types::config::GlobalConfig;

pub const DATA_DIR_ENV: &str = "LEXCHAT_DATA_DIR";
pub const BASE_URL_ENV: &str = "LEXCHAT_BASE_URL";
pub const API_KEY_ENV: &str = "LEXCHAT_API_KEY";
pub const MODEL_ENV: &str = "LEXCHAT_MODEL";

/// Everything read at startup: file settings plus the endpoint secret.
pub struct RuntimeConfig {
    pub global: GlobalConfig,
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("global", &self.global)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `LEXCHAT_DATA_DIR` environment variable
/// 2. `~/.lexchat`
/// 3. `.lexchat` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".lexchat");
    }

    PathBuf::from(".lexchat")
}

/// Load `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, defaults.
///
/// Generation profiles are normalized so each mode flag matches its profile.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(mut config) => {
            config.generation = config.generation.normalized();
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Apply `LEXCHAT_*` overrides using `lookup` to read variables, returning
/// the endpoint credential if one is set.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides(
    config: &mut GlobalConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(base_url) = get(BASE_URL_ENV) {
        tracing::debug!(%base_url, "Endpoint base URL overridden from environment");
        config.endpoint.base_url = base_url;
    }
    if let Some(model) = get(MODEL_ENV) {
        tracing::debug!(%model, "Model overridden from environment");
        config.generation.buffered.model = model.clone();
        config.generation.streaming.model = model;
    }

    get(API_KEY_ENV).map(SecretString::from)
}

/// Load the file config and apply overrides from the process environment.
pub async fn load_runtime_config(data_dir: &Path) -> RuntimeConfig {
    let mut global = load_global_config(data_dir).await;
    let api_key = apply_env_overrides(&mut global, |name| std::env::var(name).ok());
    RuntimeConfig { global, api_key }
}
