//! Configuration and per-endpoint defaults for OpenAI-compatible providers.

use secrecy::SecretString;

use lexchat_types::config::EndpointConfig;

/// Placeholder credential for local servers that do not check keys.
pub const LOCAL_PLACEHOLDER_KEY: &str = "lm-studio";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "deepseek", "lmstudio").
    pub provider_name: String,
    /// Base URL for the API including the version segment.
    pub base_url: String,
    pub api_key: SecretString,
}

/// Whether `base_url` points at this machine.
pub fn is_local_endpoint(base_url: &str) -> bool {
    let rest = base_url
        .strip_prefix("http://")
        .or_else(|| base_url.strip_prefix("https://"))
        .unwrap_or(base_url);
    let host = rest.split(['/', ':']).next().unwrap_or_default();
    matches!(host, "localhost" | "127.0.0.1" | "0.0.0.0")
}

/// Build a provider config from the endpoint section plus the optional
/// credential. Local endpoints get a placeholder key when none is set.
pub fn from_endpoint(endpoint: &EndpointConfig, api_key: Option<SecretString>) -> Option<OpenAiCompatConfig> {
    let api_key = match api_key {
        Some(key) => key,
        None if is_local_endpoint(&endpoint.base_url) => {
            SecretString::from(LOCAL_PLACEHOLDER_KEY.to_string())
        }
        None => return None,
    };
    Some(OpenAiCompatConfig {
        provider_name: endpoint.provider_name.clone(),
        base_url: endpoint.base_url.clone(),
        api_key,
    })
}
