//! LLM provider client and streaming implementation.
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch. Each [`ModelRequest`] builds a fresh agent with the
//! request's preamble and tool declarations, then opens a single streaming
//! completion. rig-core never executes tools here: tool calls are passed up
//! as [`ModelEvent::ToolCall`] for the orchestrator to run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use rig::client::CompletionClient;
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
};
use rig::providers::{anthropic, openai};
use rig::streaming::{StreamedAssistantContent, StreamingCompletion};
use rig::OneOrMany;
use std::collections::HashMap;
use tracing::debug;

use super::kind::ProviderKind;
use super::resolve::ModelSelection;
use crate::config::Config;
use crate::message::{Message, Role, ToolCall};
use crate::orchestrator::{ModelClient, ModelEvent, ModelRequest, ModelStream, ModelStreamError};
use crate::tools::rig_adapter;

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    OpenAI(openai::Client),
    Anthropic(anthropic::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider ready to stream completions.
///
/// Agents are constructed on each request since they are cheap to create
/// and carry the request's system prompt and tool set.
pub struct Provider {
    client: ClientKind,
    model: String,
}

/// Builds an agent for one [`ModelRequest`] and binds it to `$agent`.
macro_rules! with_agent {
    ($client:expr, $model:expr, $request:expr, |$agent:ident| $body:expr) => {{
        let $agent = $client
            .agent($model)
            .preamble(&$request.system)
            .max_tokens($request.max_tokens)
            .tools(rig_adapter::declare(&$request.tools))
            .build();
        $body
    }};
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::OpenAI($client) => $body,
            ClientKind::Anthropic($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

/// Maps a rig-core streaming response onto [`ModelEvent`]s.
///
/// Text chunks and complete tool calls pass through; errors become
/// [`ModelEvent::Error`] so the orchestrator keeps draining. Tool call
/// deltas, reasoning, and the final usage item are dropped.
macro_rules! into_events {
    ($response:expr) => {
        $response
            .filter_map(|chunk| {
                futures::future::ready(match chunk {
                    Ok(StreamedAssistantContent::Text(Text { text })) => {
                        Some(ModelEvent::TextDelta(text))
                    }
                    Ok(StreamedAssistantContent::ToolCall { tool_call, .. }) => {
                        Some(ModelEvent::ToolCall(from_rig_call(tool_call)))
                    }
                    Err(err) => Some(ModelEvent::Error(err.to_string())),
                    _ => None,
                })
            })
            .boxed_local()
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through shopkeep's config precedence chain
    /// (env var → config file → substitution) and builds the appropriate
    /// provider client.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is found for the selected provider
    /// or if client construction fails.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self> {
        let base_url = config
            .provider_entry(selection.provider.name())
            .and_then(|e| e.base_url.as_deref())
            .filter(|u| !u.is_empty());

        let client = match selection.provider {
            ProviderKind::OpenAI => {
                let api_key = config
                    .resolve_api_key("openai")
                    .context("No API key found for OpenAI. Set OPENAI_API_KEY or configure it in config.toml")?;
                let client = match base_url {
                    Some(url) => openai::Client::builder()
                        .api_key(&api_key)
                        .base_url(url)
                        .build()
                        .context("Failed to create OpenAI client")?,
                    None => {
                        openai::Client::new(&api_key).context("Failed to create OpenAI client")?
                    }
                };
                ClientKind::OpenAI(client)
            }
            ProviderKind::Anthropic => {
                let api_key = config
                    .resolve_api_key("anthropic")
                    .context("No API key found for Anthropic. Set ANTHROPIC_API_KEY or configure it in config.toml")?;
                let client = anthropic::Client::new(&api_key)
                    .context("Failed to create Anthropic client")?;
                ClientKind::Anthropic(client)
            }
            ProviderKind::Ollama => {
                let base_url = base_url.unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                let client = openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url.trim_end_matches('/')))
                    .build()
                    .context("Failed to create Ollama client")?;
                ClientKind::Ollama(client)
            }
        };

        Ok(Self {
            client,
            model: selection.model.clone(),
        })
    }
}

#[async_trait(?Send)]
impl ModelClient for Provider {
    async fn open_stream(&self, request: ModelRequest) -> Result<ModelStream, ModelStreamError> {
        let mut history = to_rig_messages(&request.messages);
        let prompt = history
            .pop()
            .ok_or_else(|| ModelStreamError("conversation is empty".to_string()))?;
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "opening model stream"
        );

        dispatch!(self, |client| {
            with_agent!(client, &self.model, request, |agent| {
                let response = agent
                    .stream_completion(prompt, history)
                    .await
                    .map_err(|e| ModelStreamError(e.to_string()))?
                    .stream()
                    .await
                    .map_err(|e| ModelStreamError(e.to_string()))?;
                Ok(into_events!(response))
            })
        })
    }
}

/// Keeps both ids of a streamed tool call; the Responses API needs `call_id`
/// back when the call and its result are replayed.
fn from_rig_call(tool_call: RigToolCall) -> ToolCall {
    ToolCall {
        id: tool_call.id,
        name: tool_call.function.name,
        arguments: tool_call.function.arguments,
        call_id: tool_call.call_id,
    }
}

/// Converts shopkeep history into rig-core messages, in order.
///
/// - **User** → `RigMessage::User` with text content
/// - **Assistant** (text only) → `RigMessage::Assistant` with text content
/// - **Assistant** (with tool calls) → `RigMessage::Assistant` with text then `ToolCall` items
/// - **Tool** → one tool result message per result, carrying its call's `call_id`
fn to_rig_messages(messages: &[Message]) -> Vec<RigMessage> {
    let mut call_ids: HashMap<&str, &str> = HashMap::new();
    let mut converted = Vec::with_capacity(messages.len());
    for msg in messages {
        for tc in msg.tool_calls() {
            if let Some(call_id) = tc.call_id.as_deref() {
                call_ids.insert(tc.id.as_str(), call_id);
            }
        }
        converted.extend(convert_message_to_rig(msg, &call_ids));
    }
    converted
}

fn convert_message_to_rig(msg: &Message, call_ids: &HashMap<&str, &str>) -> Vec<RigMessage> {
    match msg.role {
        Role::User => vec![RigMessage::user(msg.text())],
        Role::Assistant => {
            let calls: Vec<&ToolCall> = msg.tool_calls().collect();
            if calls.is_empty() {
                return vec![RigMessage::assistant(msg.text())];
            }
            let mut items: Vec<AssistantContent> = Vec::new();
            let text = msg.text();
            if !text.is_empty() {
                items.push(AssistantContent::Text(Text { text }));
            }
            for tc in calls {
                let mut call = RigToolCall::new(
                    tc.id.clone(),
                    ToolFunction::new(tc.name.clone(), tc.arguments.clone()),
                );
                if let Some(ref call_id) = tc.call_id {
                    call = call.with_call_id(call_id.clone());
                }
                items.push(AssistantContent::ToolCall(call));
            }
            vec![RigMessage::Assistant {
                id: None,
                content: OneOrMany::many(items)
                    .unwrap_or_else(|_| OneOrMany::one(AssistantContent::text(""))),
            }]
        }
        Role::Tool => msg
            .tool_results_iter()
            .map(|r| {
                let text = r.payload.to_model_text();
                match call_ids.get(r.id.as_str()) {
                    Some(call_id) => RigMessage::tool_result_with_call_id(
                        r.id.clone(),
                        Some(call_id.to_string()),
                        text,
                    ),
                    None => RigMessage::tool_result(r.id.clone(), text),
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ToolPayload, ToolResult};
    use rig::message::UserContent;
    use rig::providers::openai::responses_api::InputItem;
    use serde_json::json;

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: "search".into(),
            arguments: json!({"keywords": ["tv"]}),
            call_id: None,
        }
    }

    fn result(id: &str) -> ToolResult {
        ToolResult {
            id: id.into(),
            name: "search".into(),
            payload: ToolPayload::Products { products: vec![] },
        }
    }

    #[test]
    fn test_plain_history_converts_one_to_one() {
        let msgs = to_rig_messages(&[Message::user("hi"), Message::assistant("hello")]);
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0], RigMessage::User { .. }));
        assert!(matches!(msgs[1], RigMessage::Assistant { .. }));
    }

    #[test]
    fn test_tool_cycle_converts_calls_and_results() {
        let msgs = to_rig_messages(&[
            Message::user("tv?"),
            Message::assistant_with_calls("Looking", &[call("a"), call("b")]),
            Message::tool_results(&[result("a"), result("b")]),
        ]);
        assert_eq!(msgs.len(), 4);

        let RigMessage::Assistant { content, .. } = &msgs[1] else {
            panic!("expected assistant message");
        };
        let calls = content
            .iter()
            .filter(|c| matches!(c, AssistantContent::ToolCall(_)))
            .count();
        assert_eq!(calls, 2);
        assert!(matches!(content.iter().next(), Some(AssistantContent::Text(_))));

        for msg in &msgs[2..] {
            let RigMessage::User { content } = msg else {
                panic!("expected tool result as user message");
            };
            assert!(content
                .iter()
                .all(|c| matches!(c, UserContent::ToolResult(_))));
        }
    }

    #[test]
    fn test_calls_without_text_skip_text_item() {
        let msgs = to_rig_messages(&[Message::assistant_with_calls("", &[call("a")])]);
        let RigMessage::Assistant { content, .. } = &msgs[0] else {
            panic!("expected assistant message");
        };
        assert_eq!(content.iter().count(), 1);
    }

    #[test]
    fn test_streamed_call_keeps_call_id() {
        let rig_call = RigToolCall::new(
            "fc_1".to_string(),
            ToolFunction::new("search".to_string(), json!({"keywords": ["tv"]})),
        )
        .with_call_id("call_1".to_string());
        let call = from_rig_call(rig_call);
        assert_eq!(call.id, "fc_1");
        assert_eq!(call.call_id.as_deref(), Some("call_1"));
        assert_eq!(call.arguments, json!({"keywords": ["tv"]}));
    }

    #[test]
    fn test_tool_cycle_replays_through_responses_api() {
        let mut streamed = call("fc_1");
        streamed.call_id = Some("call_1".into());
        let msgs = to_rig_messages(&[
            Message::user("tv?"),
            Message::assistant_with_calls("", &[streamed]),
            Message::tool_results(&[result("fc_1")]),
        ]);
        assert_eq!(msgs.len(), 3);
        for msg in msgs {
            assert!(Vec::<InputItem>::try_from(msg).is_ok());
        }
    }
}
