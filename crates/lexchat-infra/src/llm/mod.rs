//! Completion endpoint implementations.
//!
//! Contains the concrete [`LlmProvider`](lexchat_core::llm::provider::LlmProvider)
//! for OpenAI-compatible servers and a factory ([`create_provider`]) that
//! builds it from the endpoint configuration.

pub mod openai_compat;

use secrecy::SecretString;

use lexchat_core::llm::box_provider::BoxLlmProvider;
use lexchat_types::config::EndpointConfig;
use lexchat_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the configured endpoint.
///
/// # Errors
///
/// `LlmError::AuthenticationFailed` when the endpoint is remote and no
/// credential was supplied.
pub fn create_provider(
    endpoint: &EndpointConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let config = openai_compat::config::from_endpoint(endpoint, api_key)
        .ok_or(LlmError::AuthenticationFailed)?;

    tracing::info!(
        provider = %config.provider_name,
        base_url = %config.base_url,
        "Completion endpoint configured"
    );

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}
