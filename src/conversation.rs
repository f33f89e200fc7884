//! Conversation state accumulation.
//!
//! After a cycle ends, [`commit`] appends what it produced to the history in
//! the only order a provider will accept on the next call: one assistant
//! message (answer text, then every tool call) followed, if anything ran, by
//! one tool message holding the results. [`validate`] checks that invariant
//! before a history is sent anywhere.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::message::{Message, Part, Role};
use crate::orchestrator::CycleOutcome;

/// A history that cannot be replayed to the model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("tool call {id} has no matching tool result")]
    UnpairedToolCall { id: String },
    #[error("tool result {id} does not answer an open tool call")]
    UnknownToolResult { id: String },
    #[error("{part} part is not allowed in a {role:?} message")]
    MisplacedPart { role: Role, part: &'static str },
}

/// Appends one cycle's assistant turn and tool results to `history`.
pub fn commit(history: &mut Vec<Message>, outcome: &CycleOutcome) {
    history.push(Message::assistant_with_calls(
        outcome.answer.clone(),
        &outcome.tool_calls,
    ));
    if !outcome.tool_results.is_empty() {
        history.push(Message::tool_results(&outcome.tool_results));
    }
    debug!(
        messages = history.len(),
        calls = outcome.tool_calls.len(),
        results = outcome.tool_results.len(),
        failed = outcome.tool_results.iter().filter(|r| r.payload.is_error()).count(),
        "committed cycle to history"
    );
}

/// Checks that every tool call is answered exactly once, by a tool message
/// that follows it, before the conversation moves on.
pub fn validate(history: &[Message]) -> Result<(), HistoryError> {
    let mut open: Vec<String> = Vec::new();

    for message in history {
        match message.role {
            Role::Tool => {
                for part in message.parts() {
                    match part {
                        Part::ToolResult(result) => {
                            let Some(pos) = open.iter().position(|id| *id == result.id) else {
                                return Err(HistoryError::UnknownToolResult {
                                    id: result.id.clone(),
                                });
                            };
                            open.remove(pos);
                        }
                        Part::ToolCall(_) => return Err(misplaced(Role::Tool, "tool call")),
                        Part::Text { .. } => {}
                    }
                }
            }
            role => {
                if let Some(id) = open.first() {
                    return Err(HistoryError::UnpairedToolCall { id: id.clone() });
                }
                let mut seen = HashSet::new();
                for part in message.parts() {
                    match part {
                        Part::ToolCall(call) if role == Role::Assistant => {
                            if !seen.insert(call.id.as_str()) {
                                return Err(HistoryError::UnpairedToolCall { id: call.id.clone() });
                            }
                            open.push(call.id.clone());
                        }
                        Part::ToolCall(_) => return Err(misplaced(role, "tool call")),
                        Part::ToolResult(_) => return Err(misplaced(role, "tool result")),
                        Part::Text { .. } => {}
                    }
                }
            }
        }
    }

    match open.into_iter().next() {
        Some(id) => Err(HistoryError::UnpairedToolCall { id }),
        None => Ok(()),
    }
}

fn misplaced(role: Role, part: &'static str) -> HistoryError {
    HistoryError::MisplacedPart { role, part }
}
