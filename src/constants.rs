//! Centralized constants for shopkeep.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "shopkeep";

/// Default LLM model identifier (OpenAI).
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 2500;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "shopkeep.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Default LLM model identifier for Anthropic.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-6";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Environment variable that overrides the configured model.
pub const MODEL_ENV_VAR: &str = "OPENAI_API_MODEL";

/// Environment variable that overrides the store display name.
pub const STORE_NAME_ENV_VAR: &str = "STORE_NAME";

/// Environment variable that overrides the catalog base URL.
pub const STORE_URL_ENV_VAR: &str = "STORE_URL";

/// Store name used in the system prompt when none is configured.
pub const DEFAULT_STORE_NAME: &str = "the";

// --- Catalog ---

/// Shortest catalog base URL accepted before any request is made.
pub const MIN_STORE_URL_LEN: usize = 5;

/// Path of the product listing, relative to the store base URL.
pub const PRODUCTS_PATH: &str = "/products.json";

/// Default HTTP timeout for catalog requests, in seconds.
pub const CATALOG_TIMEOUT_SECS: u64 = 30;

// --- Search tool ---

/// Name the model uses to call the catalog search tool.
pub const SEARCH_TOOL_NAME: &str = "search";

/// Default number of products returned by one search.
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// Hard cap on products returned by one search; larger requests are clamped.
pub const MAX_RESULTS_CAP: u32 = 20;

/// Extra model cycles allowed after a cycle that called tools.
pub const DEFAULT_MAX_TOOL_ROUNDTRIPS: usize = 3;

// --- Answer notes ---

/// Note appended to the answer when the model stream reports a fault.
pub const STREAM_ERROR_NOTE: &str = "\nError occurred while executing the tool";

/// Default system prompt. `{store}` is replaced with the store display name.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "As a professional shopify product search expert, you possess the ability to search \
for any information on the {store} shopify store. \
For each user query, utilize the product results to their fullest potential to provide \
additional information and assistance in your response. \
Aim to directly address the user's question, augmenting your response with insights \
gleaned from the search results. \
When searching, break the request into short atomic keywords (for example \"tv\", \"55 inch\", \"4k\") \
rather than full sentences. \
Please match the language of the response to the user's language.";
