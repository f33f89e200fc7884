//! Builds the pieces a turn needs from the loaded config.

use anyhow::{Context, Result};

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::orchestrator::Orchestrator;
use crate::provider::{ModelSelection, Provider};
use crate::tools::ToolRegistry;

/// Provider, tools and prompt for one process. Read-only after startup.
pub struct Assistant {
    provider: Provider,
    tools: ToolRegistry,
    system_prompt: String,
    max_tokens: u64,
    pub max_roundtrips: usize,
    /// `provider/model`, for banners.
    pub model: String,
}

impl Assistant {
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let provider = Provider::from_config(config, selection)?;
        let tools = ToolRegistry::with_search(
            catalog_client(config)?,
            config.store_url(),
            config.search_schema(),
        );
        Ok(Self {
            provider,
            tools,
            system_prompt: config.system_prompt(),
            max_tokens: config.max_tokens,
            max_roundtrips: config.max_tool_roundtrips(),
            model: format!("{}/{}", selection.provider, selection.model),
        })
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(
            &self.provider,
            &self.tools,
            self.system_prompt.as_str(),
            self.max_tokens,
        )
    }
}

/// HTTP client for the configured storefront.
pub fn catalog_client(config: &Config) -> Result<CatalogClient> {
    CatalogClient::new(config.catalog_timeout(), config.store.page_size)
        .context("Failed to create catalog HTTP client")
}
