//! Environment variable substitution and derived settings.

use std::time::Duration;

use super::types::{Config, ProviderEntry};
use crate::constants::{
    CATALOG_TIMEOUT_SECS, DEFAULT_MAX_TOOL_ROUNDTRIPS, DEFAULT_STORE_NAME, DEFAULT_SYSTEM_PROMPT,
    MODEL_ENV_VAR, STORE_NAME_ENV_VAR, STORE_URL_ENV_VAR,
};
use crate::tools::search::SearchSchema;

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        for field in [
            &mut self.system_prompt,
            &mut self.default_provider,
            &mut self.store.name,
            &mut self.store.url,
        ] {
            if let Some(value) = field {
                *value = Self::resolve_str(value);
            }
        }
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.ollama);
    }

    /// Applies `OPENAI_API_MODEL`, `STORE_NAME` and `STORE_URL` when set and non-empty.
    pub(super) fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(model) = get(MODEL_ENV_VAR) {
            self.model = model;
        }
        if let Some(name) = get(STORE_NAME_ENV_VAR) {
            self.store.name = Some(name);
        }
        if let Some(url) = get(STORE_URL_ENV_VAR) {
            self.store.url = Some(url);
        }
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        // Check env var first (OPENAI_API_KEY, ANTHROPIC_API_KEY, etc.)
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        self.provider_entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|k| !k.is_empty())
    }

    /// Configured entry for a provider name, if any.
    pub fn provider_entry(&self, provider: &str) -> Option<&ProviderEntry> {
        match provider {
            "openai" => self.provider.openai.as_ref(),
            "anthropic" => self.provider.anthropic.as_ref(),
            "ollama" => self.provider.ollama.as_ref(),
            _ => None,
        }
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref().filter(|p| !p.is_empty())
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m.is_empty() || m == crate::constants::DEFAULT_MODEL {
            return None;
        }
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }

    /// Catalog base URL. May be empty; the search tool rejects it per call.
    pub fn store_url(&self) -> &str {
        self.store.url.as_deref().unwrap_or_default()
    }

    pub fn store_name(&self) -> &str {
        self.store
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_STORE_NAME)
    }

    /// System instructions with the store name filled in.
    pub fn system_prompt(&self) -> String {
        self.system_prompt
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .replace("{store}", self.store_name())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout_secs.unwrap_or(CATALOG_TIMEOUT_SECS))
    }

    pub fn search_schema(&self) -> SearchSchema {
        self.search.schema.unwrap_or_default()
    }

    pub fn max_tool_roundtrips(&self) -> usize {
        self.search
            .max_tool_roundtrips
            .unwrap_or(DEFAULT_MAX_TOOL_ROUNDTRIPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_str_substitutes_env_vars() {
        std::env::set_var("SHOPKEEP_TEST_RESOLVE", "value");
        assert_eq!(
            Config::resolve_str("a-{env:SHOPKEEP_TEST_RESOLVE}-b"),
            "a-value-b"
        );
        assert_eq!(Config::resolve_str("{env:SHOPKEEP_TEST_UNSET_XYZ}"), "");
        assert_eq!(Config::resolve_str("{env:broken"), "{env:broken");
    }

    #[test]
    fn env_overrides_win_when_non_empty() {
        let mut config = Config::default();
        config.store.url = Some("https://from-file.example".into());
        config.apply_env_overrides(|key| match key {
            "OPENAI_API_MODEL" => Some("gpt-4o".into()),
            "STORE_URL" => Some("  ".into()),
            "STORE_NAME" => Some("Acme".into()),
            _ => None,
        });
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.store_url(), "https://from-file.example");
        assert_eq!(config.store_name(), "Acme");
    }

    #[test]
    fn system_prompt_names_the_store() {
        let mut config = Config::default();
        config.store.name = Some("Acme".into());
        assert!(config.system_prompt().contains("on the Acme shopify store"));

        config.system_prompt = Some("You sell for {store}.".into());
        assert_eq!(config.system_prompt(), "You sell for Acme.");
    }

    #[test]
    fn defaults_apply_without_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.max_tokens, 2500);
        assert_eq!(config.search_schema(), SearchSchema::Keywords);
        assert_eq!(config.max_tool_roundtrips(), 3);
        assert_eq!(config.catalog_timeout(), Duration::from_secs(30));
        assert_eq!(config.store_url(), "");
        assert_eq!(config.model_name(), None);
    }

    #[test]
    fn merge_prefers_project_values() {
        let global: Config = toml::from_str(
            r#"
model = "gpt-4o"
[store]
url = "https://global.example"
name = "Global"
[search]
max_tool_roundtrips = 2
"#,
        )
        .unwrap();
        let project: Config = toml::from_str(
            r#"
[store]
url = "https://project.example"
[search]
schema = "query"
"#,
        )
        .unwrap();
        let merged = Config::merge(global, project);
        assert_eq!(merged.model, "gpt-4o");
        assert_eq!(merged.store_url(), "https://project.example");
        assert_eq!(merged.store_name(), "Global");
        assert_eq!(merged.search_schema(), SearchSchema::Query);
        assert_eq!(merged.max_tool_roundtrips(), 2);
    }
}
