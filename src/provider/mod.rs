//! LLM provider abstraction for shopkeep.
//!
//! Wraps rig-core's provider clients behind a [`Provider`] struct with enum
//! dispatch and exposes it to the orchestrator as a
//! [`ModelClient`](crate::orchestrator::ModelClient). Supports OpenAI,
//! Anthropic, and Ollama (local).

mod client;
mod kind;
mod resolve;

pub use client::Provider;
pub use resolve::{resolve_model, ModelSelection};
