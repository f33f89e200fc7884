//! Tool registry for shopkeep.
//!
//! Tools are declared to the model by name, description and JSON schema, and
//! executed by the orchestrator when the model calls them. The only built-in
//! tool is catalog [`search`](search::SearchTool).

pub mod rig_adapter;
pub mod search;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{CatalogClient, CatalogError, Product};
use search::{SearchSchema, SearchTool};

/// Why a tool call produced no products.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments did not match the declared schema.
    #[error("invalid tool arguments: {0}")]
    Argument(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Definition sent to the LLM so it knows what tools are available.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Every tool implements this trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the LLM uses to call this tool.
    fn name(&self) -> &str;

    /// Human-readable description for the LLM.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Short label for a call, shown on badges and error cards.
    fn summarize(&self, input: &Value) -> String {
        input.to_string()
    }

    /// Validate `input` and run the tool.
    async fn execute(&self, input: Value) -> Result<Vec<Product>, ToolError>;
}

/// Holds all registered tools and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(Arc::from(tool));
    }

    /// Produce definitions for the LLM (sent in the API request).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Label for a call; falls back to the raw arguments for unknown tools.
    pub fn summarize(&self, name: &str, input: &Value) -> String {
        match self.find(name) {
            Some(tool) => tool.summarize(input),
            None => input.to_string(),
        }
    }

    /// Look up a tool by name and execute it.
    pub async fn execute(&self, name: &str, input: Value) -> Result<Vec<Product>, ToolError> {
        let tool = self
            .find(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(input).await
    }

    /// How many tools are registered.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl ToolRegistry {
    /// Create a registry holding the catalog search tool bound to `store_url`.
    pub fn with_search(
        catalog: CatalogClient,
        store_url: impl Into<String>,
        schema: SearchSchema,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SearchTool::new(catalog, store_url, schema)));
        registry
    }
}
