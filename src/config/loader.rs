//! File loading and merging for shopkeep configuration.

use anyhow::{Context, Result};
use std::fs;

use super::types::{
    default_max_tokens, default_model, Config, ProviderConfig, SearchConfig, StoreConfig,
};

impl Config {
    /// Loads the global config from `~/.config/shopkeep/config.toml`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including `{env:VAR}` placeholders for keys and the store) and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = format!(
                r#"model = "{}"
default_provider = "{}"

[store]
name = "{{env:STORE_NAME}}"
url = "{{env:STORE_URL}}"

[search]
schema = "keywords"

[provider]

[provider.openai]
api_key = "{{env:OPENAI_API_KEY}}"

[provider.anthropic]
api_key = "{{env:ANTHROPIC_API_KEY}}"

[provider.ollama]
base_url = "http://localhost:11434"
"#,
                default_model(),
                crate::constants::DEFAULT_PROVIDER,
            );
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            let config: Config = toml::from_str(&default_toml)
                .with_context(|| "Failed to parse default config".to_string())?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Look for shopkeep.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)?;
                let config: Config = toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse config at {:?}", candidate))?;
                return Ok(Some(config));
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: if project.model != default_model() {
                project.model
            } else {
                global.model
            },
            provider: ProviderConfig {
                openai: project.provider.openai.or(global.provider.openai),
                anthropic: project.provider.anthropic.or(global.provider.anthropic),
                ollama: project.provider.ollama.or(global.provider.ollama),
            },
            default_provider: project.default_provider.or(global.default_provider),
            system_prompt: project.system_prompt.or(global.system_prompt),
            max_tokens: if project.max_tokens != default_max_tokens() {
                project.max_tokens
            } else {
                global.max_tokens
            },
            store: StoreConfig {
                name: project.store.name.or(global.store.name),
                url: project.store.url.or(global.store.url),
                page_size: project.store.page_size.or(global.store.page_size),
                timeout_secs: project.store.timeout_secs.or(global.store.timeout_secs),
            },
            search: SearchConfig {
                schema: project.search.schema.or(global.search.schema),
                max_tool_roundtrips: project
                    .search
                    .max_tool_roundtrips
                    .or(global.search.max_tool_roundtrips),
            },
        }
    }
}
