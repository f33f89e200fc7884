//! The catalog `search` tool.
//!
//! Two argument shapes exist. [`SearchSchema::Keywords`] takes an array of
//! short keywords and is the canonical one; [`SearchSchema::Query`] takes one
//! free-text `search_query` and is kept for older prompts. Exactly one shape
//! is active per registry and the other is rejected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{Tool, ToolError};
use crate::catalog::{CatalogClient, Product, SearchQuery};
use crate::constants::{DEFAULT_MAX_RESULTS, MAX_RESULTS_CAP, SEARCH_TOOL_NAME};

/// Which argument shape the search tool declares and accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSchema {
    #[default]
    Keywords,
    Query,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KeywordsInput {
    keywords: Vec<String>,
    #[serde(default)]
    max_results: Option<i64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryInput {
    search_query: String,
    #[serde(default)]
    max_results: Option<i64>,
}

/// Trims keywords and rejects an empty list or a blank keyword, which would
/// otherwise match every title.
pub fn normalize_keywords(keywords: Vec<String>) -> Result<Vec<String>, ToolError> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.trim().to_string()).collect();
    if keywords.is_empty() {
        return Err(ToolError::Argument("at least one keyword is required".into()));
    }
    if keywords.iter().any(String::is_empty) {
        return Err(ToolError::Argument("keywords must not be blank".into()));
    }
    Ok(keywords)
}

/// Validates raw tool arguments into a [`SearchQuery`].
///
/// Keywords are trimmed and must be non-empty. `max_results` defaults to 5,
/// must be at least 1, and is clamped to 20.
pub fn parse_query(schema: SearchSchema, input: Value) -> Result<SearchQuery, ToolError> {
    let (keywords, max_results) = match schema {
        SearchSchema::Keywords => {
            let input: KeywordsInput =
                serde_json::from_value(input).map_err(|e| ToolError::Argument(e.to_string()))?;
            (input.keywords, input.max_results)
        }
        SearchSchema::Query => {
            let input: QueryInput =
                serde_json::from_value(input).map_err(|e| ToolError::Argument(e.to_string()))?;
            (vec![input.search_query], input.max_results)
        }
    };

    let keywords = normalize_keywords(keywords)?;

    let limit = match max_results {
        None => DEFAULT_MAX_RESULTS,
        Some(n) if n < 1 => {
            return Err(ToolError::Argument(format!("max_results must be at least 1, got {n}")))
        }
        Some(n) if n > i64::from(MAX_RESULTS_CAP) => {
            debug!(requested = n, cap = MAX_RESULTS_CAP, "clamping max_results");
            MAX_RESULTS_CAP
        }
        Some(n) => n as u32,
    };

    Ok(SearchQuery::new(keywords, limit))
}

/// Searches the configured storefront for products.
pub struct SearchTool {
    catalog: CatalogClient,
    /// Catalog base URL, fixed for the process lifetime.
    store_url: String,
    schema: SearchSchema,
}

impl SearchTool {
    pub fn new(catalog: CatalogClient, store_url: impl Into<String>, schema: SearchSchema) -> Self {
        Self {
            catalog,
            store_url: store_url.into(),
            schema,
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the shopify store for specific products"
    }

    fn schema(&self) -> Value {
        let max_results = json!({
            "type": "integer",
            "minimum": 1,
            "maximum": MAX_RESULTS_CAP,
            "default": DEFAULT_MAX_RESULTS,
            "description": "The maximum number of product results to return"
        });
        match self.schema {
            SearchSchema::Keywords => json!({
                "type": "object",
                "properties": {
                    "keywords": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                        "description": "An array of strings, with keywords for the product/s the user is looking for, for example: [\"tv\", \"55 inch\", \"4k\", ...]"
                    },
                    "max_results": max_results
                },
                "required": ["keywords"]
            }),
            SearchSchema::Query => json!({
                "type": "object",
                "properties": {
                    "search_query": {
                        "type": "string",
                        "description": "The product the user is looking for"
                    },
                    "max_results": max_results
                },
                "required": ["search_query"]
            }),
        }
    }

    fn summarize(&self, input: &Value) -> String {
        match parse_query(self.schema, input.clone()) {
            Ok(query) => query.display(),
            Err(_) => input.to_string(),
        }
    }

    async fn execute(&self, input: Value) -> Result<Vec<Product>, ToolError> {
        let query = parse_query(self.schema, input)?;
        Ok(self.catalog.search(&self.store_url, &query).await?)
    }
}
