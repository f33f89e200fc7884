//! Provider kind enumeration and default model mapping.

use anyhow::{anyhow, Result};

/// Identifies which LLM provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenAI (GPT models). The default.
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
    /// Ollama (local models via OpenAI-compatible API).
    Ollama,
}

impl ProviderKind {
    /// Parses a provider name string into a [`ProviderKind`].
    ///
    /// Matching is case-insensitive. Returns an error for unknown providers.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => Err(anyhow!(
                "Unknown provider: {other}. Supported: openai, anthropic, ollama"
            )),
        }
    }

    /// Config and environment key prefix for this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        }
    }

    /// Default model identifier for this provider.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAI => crate::constants::DEFAULT_MODEL,
            Self::Anthropic => crate::constants::DEFAULT_ANTHROPIC_MODEL,
            Self::Ollama => crate::constants::OLLAMA_DEFAULT_MODEL,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
