//! Model resolution logic for shopkeep.
//!
//! Resolves which provider and model to use based on CLI flags, config file,
//! and hardcoded defaults. Supports `provider/model` shorthand syntax.

use anyhow::Result;

use super::kind::ProviderKind;
use crate::config::Config;
use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolve which provider and model to use.
/// Priority: CLI flags > config (including `OPENAI_API_MODEL`) > provider entry > defaults.
///
/// Accepts these formats:
///   --model anthropic/claude-sonnet-4-6  (provider/model shorthand, only when --provider is omitted)
///   --provider anthropic --model claude-sonnet-4-6
///   --provider ollama  (uses provider's default model)
///   (nothing)  (uses config.toml, then hardcoded default)
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((prov, model)) = cli_model.and_then(|m| m.split_once('/')) {
            return Ok(ModelSelection {
                provider: ProviderKind::from_str(prov)?,
                model: model.to_string(),
            });
        }
    }

    let provider_str = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER);
    let provider = ProviderKind::from_str(provider_str)?;

    let model = cli_model
        .map(String::from)
        .or_else(|| config.model_name())
        .or_else(|| {
            config
                .provider_entry(provider.name())
                .and_then(|e| e.model.clone())
                .filter(|m| !m.is_empty())
        })
        .unwrap_or_else(|| provider.default_model().to_string());

    Ok(ModelSelection { provider, model })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn defaults_to_openai_turbo() {
        let sel = resolve_model(None, None, &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::OpenAI);
        assert_eq!(sel.model, "gpt-4-turbo");
    }

    #[test]
    fn shorthand_selects_provider() {
        let sel = resolve_model(None, Some("anthropic/claude-x"), &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::Anthropic);
        assert_eq!(sel.model, "claude-x");
    }

    #[test]
    fn provider_flag_uses_its_default_model() {
        let sel = resolve_model(Some("ollama"), None, &Config::default()).unwrap();
        assert_eq!(sel.provider, ProviderKind::Ollama);
        assert_eq!(sel.model, "llama3");
    }

    #[test]
    fn configured_model_wins_over_provider_default() {
        let config: Config = toml::from_str(
            r#"
model = "gpt-4o"
[provider.openai]
model = "gpt-4o-mini"
"#,
        )
        .unwrap();
        let sel = resolve_model(None, None, &config).unwrap();
        assert_eq!(sel.model, "gpt-4o");

        let config: Config = toml::from_str(
            r#"
default_provider = "anthropic"
[provider.anthropic]
model = "claude-haiku"
"#,
        )
        .unwrap();
        let sel = resolve_model(None, None, &config).unwrap();
        assert_eq!(sel.provider, ProviderKind::Anthropic);
        assert_eq!(sel.model, "claude-haiku");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(resolve_model(Some("openrouter"), None, &Config::default()).is_err());
    }
}
