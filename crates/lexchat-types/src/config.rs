//! Configuration types for lexchat.
//!
//! `GlobalConfig` represents the top-level `config.toml`: where the
//! completion endpoint lives, how much history goes into a prompt, and the
//! fixed generation parameters for each delivery mode. All fields have
//! defaults matching the hosted DeepSeek setup.

use serde::{Deserialize, Serialize};

use crate::llm::TokenLimit;

/// Top-level configuration, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub generation: GenerationProfiles,
}

/// Location of the OpenAI-compatible completion endpoint.
///
/// The credential is deliberately absent: it is read from the environment
/// and held as a secret by the infrastructure layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Name used in logs and spans (e.g., "deepseek", "lmstudio").
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    /// Base URL including the version segment (e.g., "https://api.deepseek.com/v1").
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_provider_name() -> String {
    "deepseek".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_base_url(),
        }
    }
}

/// What to do with a `<think>` marker that is never closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedThink {
    /// Leave the text from the marker on untouched.
    #[default]
    Preserve,
    /// Drop everything from the marker to the end of the text.
    Strip,
}

/// Prompt assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of stored messages read back into the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: u32,

    #[serde(default)]
    pub unterminated_think: UnterminatedThink,
}

fn default_history_window() -> u32 {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            unterminated_think: UnterminatedThink::default(),
        }
    }
}

/// Generation parameters forwarded to the endpoint.
///
/// `stream` selects buffered or incremental dispatch; the other fields are
/// opaque pass-through values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: TokenLimit,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    #[serde(default)]
    pub stream: bool,
}

impl GenerationConfig {
    /// Parameters used by the buffered JSON endpoint.
    pub fn buffered_defaults() -> Self {
        Self {
            model: "deepseek-reasoner".to_string(),
            temperature: 0.5,
            max_tokens: TokenLimit::Limited(3000),
            presence_penalty: 0.6,
            frequency_penalty: 0.6,
            stream: false,
        }
    }

    /// Parameters used by the streaming endpoint.
    pub fn streaming_defaults() -> Self {
        Self {
            max_tokens: TokenLimit::Unbounded,
            stream: true,
            ..Self::buffered_defaults()
        }
    }
}

/// The fixed generation parameters per delivery mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationProfiles {
    #[serde(default = "GenerationConfig::buffered_defaults")]
    pub buffered: GenerationConfig,

    #[serde(default = "GenerationConfig::streaming_defaults")]
    pub streaming: GenerationConfig,
}

impl Default for GenerationProfiles {
    fn default() -> Self {
        Self {
            buffered: GenerationConfig::buffered_defaults(),
            streaming: GenerationConfig::streaming_defaults(),
        }
    }
}

impl GenerationProfiles {
    /// Force the mode flags to agree with the profile they sit in, whatever
    /// the file said.
    pub fn normalized(mut self) -> Self {
        self.buffered.stream = false;
        self.streaming.stream = true;
        self
    }
}
