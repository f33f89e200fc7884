//! Struct definitions and serde defaults for shopkeep configuration.

use serde::{Deserialize, Serialize};

use crate::tools::search::SearchSchema;

/// Root configuration for shopkeep, deserialized from `config.toml`.
///
/// Fields use serde defaults so shopkeep can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default model identifier (e.g. `"gpt-4-turbo"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Default provider name (e.g., "openai", "anthropic").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Replaces the built-in shopping assistant instructions. `{store}` is
    /// replaced with the store name.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum output tokens per model cycle.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,
    /// The storefront being searched.
    #[serde(default)]
    pub store: StoreConfig,
    /// Search tool settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Returns the default model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

pub(super) fn default_max_tokens() -> u64 {
    crate::constants::MAX_TOKENS
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the OpenAI API provider.
    pub openai: Option<ProviderEntry>,
    /// Configuration for the Anthropic API provider.
    pub anthropic: Option<ProviderEntry>,
    /// Configuration for the local Ollama provider.
    pub ollama: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API (useful for proxies or self-hosted instances).
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// Storefront connection settings.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Display name used in the system prompt.
    pub name: Option<String>,
    /// Catalog base URL; products are read from `{url}/products.json`.
    pub url: Option<String>,
    /// Sent as `?limit=N` when set.
    pub page_size: Option<u32>,
    /// HTTP timeout for catalog requests, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Search tool settings.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Argument shape declared to the model: `keywords` or `query`.
    pub schema: Option<SearchSchema>,
    /// Extra model cycles allowed after a cycle that called tools.
    pub max_tool_roundtrips: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            provider: ProviderConfig::default(),
            default_provider: None,
            system_prompt: None,
            max_tokens: default_max_tokens(),
            store: StoreConfig::default(),
            search: SearchConfig::default(),
        }
    }
}
