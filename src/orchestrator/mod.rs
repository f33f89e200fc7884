//! Streaming orchestration of one model cycle.
//!
//! [`Orchestrator::run_cycle`] sends the history, system instructions and tool
//! declarations to a [`ModelClient`], then consumes the returned event stream
//! one event at a time. Text deltas grow the answer. Tool calls are executed
//! against the [`ToolRegistry`] and their results are pushed back into the
//! event sequence right after the call. Faults become an error flag plus a
//! note in the answer; only failing to open the stream (or a malformed
//! history) fails the cycle outright.

mod state;

pub use state::CycleOutcome;
use state::StreamState;

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::stream::LocalBoxStream;
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::STREAM_ERROR_NOTE;
use crate::conversation::{self, HistoryError};
use crate::message::{Message, ToolCall, ToolPayload, ToolResult};
use crate::output::{Renderer, Section, UiEvent};
use crate::tools::{ToolDefinition, ToolRegistry};

/// One event from the model stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    TextDelta(String),
    ToolCall(ToolCall),
    ToolResult(ToolResult),
    /// A fault reported mid-stream (provider error, timeout, bad chunk).
    Error(String),
}

/// Everything the model needs for one cycle.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u64,
}

/// Ordered model events, ending when the provider closes the stream.
pub type ModelStream = LocalBoxStream<'static, ModelEvent>;

/// The stream could not be opened. Nothing was emitted.
#[derive(Debug, Error)]
#[error("failed to open model stream: {0}")]
pub struct ModelStreamError(pub String);

/// Hard failures of a cycle, raised before any event is consumed.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("conversation history is malformed: {0}")]
    History(#[from] HistoryError),
    #[error(transparent)]
    Stream(#[from] ModelStreamError),
}

/// A language model that streams events for a request.
#[async_trait(?Send)]
pub trait ModelClient {
    async fn open_stream(&self, request: ModelRequest) -> Result<ModelStream, ModelStreamError>;
}

/// Runs model cycles with tool mediation.
pub struct Orchestrator<'a> {
    model: &'a dyn ModelClient,
    tools: &'a ToolRegistry,
    system_prompt: String,
    max_tokens: u64,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        model: &'a dyn ModelClient,
        tools: &'a ToolRegistry,
        system_prompt: impl Into<String>,
        max_tokens: u64,
    ) -> Self {
        Self {
            model,
            tools,
            system_prompt: system_prompt.into(),
            max_tokens,
        }
    }

    /// Runs exactly one request/response cycle with the model.
    ///
    /// Consumes events until the stream closes, never stopping early on a
    /// stream-level error. Dropping the returned future abandons the cycle
    /// and releases the stream; UI events already emitted stand.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError`] only if `history` is malformed or the stream
    /// cannot be opened. Every later failure is reported in the outcome.
    pub async fn run_cycle(
        &self,
        history: &[Message],
        renderer: &mut dyn Renderer,
    ) -> Result<CycleOutcome, TurnError> {
        conversation::validate(history)?;

        let request = ModelRequest {
            system: self.system_prompt.clone(),
            messages: history.to_vec(),
            tools: self.tools.definitions(),
            max_tokens: self.max_tokens,
        };
        let mut stream = self.model.open_stream(request).await?;
        renderer.begin_cycle();

        let mut state = StreamState::new();
        let mut injected: VecDeque<ModelEvent> = VecDeque::new();

        loop {
            let event = match injected.pop_front() {
                Some(event) => event,
                None => match stream.next().await {
                    Some(event) => event,
                    None => break,
                },
            };
            state.count_event();

            match event {
                ModelEvent::TextDelta(delta) => {
                    if state.push_text(&delta) {
                        renderer.emit(UiEvent::Update(Section::Answer));
                    }
                    if !delta.is_empty() {
                        renderer.emit(UiEvent::AnswerUpdated(state.answer().to_string()));
                    }
                }
                ModelEvent::ToolCall(call) => {
                    if let Some(result) = self.handle_tool_call(&mut state, call, renderer).await {
                        injected.push_back(ModelEvent::ToolResult(result));
                    }
                }
                ModelEvent::ToolResult(result) => {
                    state.complete(result);
                }
                ModelEvent::Error(message) => {
                    warn!(%message, "model stream reported an error");
                    state.note_error(STREAM_ERROR_NOTE);
                    renderer.emit(UiEvent::AnswerUpdated(state.answer().to_string()));
                }
            }
        }

        let outcome = state.finish();
        debug!(
            events = outcome.events,
            calls = outcome.tool_calls.len(),
            error = outcome.error_occurred,
            "model cycle finished"
        );
        Ok(outcome)
    }

    /// Executes one tool call and returns its result for re-injection.
    ///
    /// Returns `None` when the call id was already seen in this cycle.
    async fn handle_tool_call(
        &self,
        state: &mut StreamState,
        mut call: ToolCall,
        renderer: &mut dyn Renderer,
    ) -> Option<ToolResult> {
        if call.id.is_empty() {
            call.id = format!("call_{}", Uuid::new_v4().simple());
        }
        if !state.record_call(call.clone()) {
            warn!(call_id = %call.id, "ignoring repeated tool call id");
            return None;
        }

        let query = self.tools.summarize(&call.name, &call.arguments);
        debug!(call_id = %call.id, tool = %call.name, %query, "dispatching tool call");
        renderer.emit(UiEvent::Update(Section::ToolBadge {
            tool: call.name.clone(),
            query: query.clone(),
        }));
        renderer.emit(UiEvent::Append(Section::SearchSkeleton));

        let payload = match self.tools.execute(&call.name, call.arguments.clone()).await {
            Ok(products) => {
                let images = products.iter().filter_map(|p| p.image.clone()).collect();
                renderer.emit(UiEvent::Update(Section::Images {
                    query: query.clone(),
                    images,
                }));
                renderer.emit(UiEvent::Append(Section::Answer));
                ToolPayload::Products { products }
            }
            Err(err) => {
                warn!(call_id = %call.id, tool = %call.name, error = %err, "tool call failed");
                state.note_error(&format!("\nAn error occurred while searching for \"{query}\"."));
                renderer.emit(UiEvent::AnswerUpdated(state.answer().to_string()));
                renderer.emit(UiEvent::Update(Section::ErrorCard {
                    message: format!("An error occurred while searching for \"{query}\"."),
                }));
                ToolPayload::Error {
                    message: err.to_string(),
                }
            }
        };

        Some(ToolResult {
            id: call.id,
            name: call.name,
            payload,
        })
    }
}
