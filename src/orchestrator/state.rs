//! Per-cycle stream state.
//!
//! A [`StreamState`] is created when a cycle opens its model stream, mutated
//! only by that cycle's event loop, and consumed by [`StreamState::finish`].
//! Tool calls and results are correlated by call id: every recorded call owns
//! a slot that moves from pending to completed exactly once.

use std::collections::HashMap;

use tracing::warn;

use crate::message::{ToolCall, ToolPayload, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallSlot {
    Pending,
    Completed,
}

/// What one model cycle produced.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    pub answer: String,
    pub error_occurred: bool,
    /// Tool calls in emission order.
    pub tool_calls: Vec<ToolCall>,
    /// Tool results in completion order, one per call.
    pub tool_results: Vec<ToolResult>,
    /// Number of events consumed, injected tool results included.
    pub events: usize,
}

#[derive(Debug, Default)]
pub struct StreamState {
    answer: String,
    error: bool,
    answer_started: bool,
    calls: Vec<ToolCall>,
    slots: HashMap<String, CallSlot>,
    results: Vec<ToolResult>,
    events: usize,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn count_event(&mut self) {
        self.events += 1;
    }

    /// Appends a text delta. Returns true for the first non-empty delta of the cycle.
    pub fn push_text(&mut self, delta: &str) -> bool {
        if delta.is_empty() {
            return false;
        }
        self.answer.push_str(delta);
        !std::mem::replace(&mut self.answer_started, true)
    }

    /// Marks the cycle as failed and appends a note to the answer.
    pub fn note_error(&mut self, note: &str) {
        self.error = true;
        self.answer.push_str(note);
    }

    /// Records a call and opens its slot. Returns false if the id is already known.
    pub fn record_call(&mut self, call: ToolCall) -> bool {
        if self.slots.contains_key(&call.id) {
            return false;
        }
        self.slots.insert(call.id.clone(), CallSlot::Pending);
        self.calls.push(call);
        true
    }

    /// Closes the slot of `result.id`. Results for unknown or already
    /// completed calls are dropped and false is returned.
    pub fn complete(&mut self, result: ToolResult) -> bool {
        match self.slots.get_mut(&result.id) {
            Some(slot) if *slot == CallSlot::Pending => {
                *slot = CallSlot::Completed;
                self.results.push(result);
                true
            }
            Some(_) => {
                warn!(call_id = %result.id, "dropping duplicate tool result");
                false
            }
            None => {
                warn!(call_id = %result.id, "dropping tool result for unknown call");
                false
            }
        }
    }

    /// Ends the cycle. Calls that never completed get an error result so the
    /// committed history stays paired.
    pub fn finish(mut self) -> CycleOutcome {
        let unresolved: Vec<ToolCall> = self
            .calls
            .iter()
            .filter(|c| self.slots.get(&c.id) == Some(&CallSlot::Pending))
            .cloned()
            .collect();
        for call in unresolved {
            warn!(call_id = %call.id, tool = %call.name, "tool call left unresolved");
            self.error = true;
            self.complete(ToolResult {
                id: call.id,
                name: call.name,
                payload: ToolPayload::Error {
                    message: "tool call was not resolved".to_string(),
                },
            });
        }

        CycleOutcome {
            answer: self.answer,
            error_occurred: self.error,
            tool_calls: self.calls,
            tool_results: self.results,
            events: self.events,
        }
    }
}
