//! Entry point for a full user turn.
//!
//! Provides [`run_turn`], which drives one or more orchestrator cycles and
//! commits each into the conversation history. A cycle that called tools is
//! followed by another so the model can answer from the results, up to
//! `max_roundtrips` extra cycles.

use tracing::debug;

use crate::conversation;
use crate::message::Message;
use crate::orchestrator::{CycleOutcome, Orchestrator, TurnError};
use crate::output::Renderer;

/// What the caller gets back from a turn. The updated history is the
/// `history` argument itself.
#[derive(Debug, Default)]
pub struct TurnResult {
    /// Answer of the last cycle that produced any text.
    pub answer: String,
    /// True if any cycle recorded an error.
    pub error_occurred: bool,
    /// Every cycle in order, for the caller's own bookkeeping.
    pub cycles: Vec<CycleOutcome>,
}

impl TurnResult {
    fn absorb(&mut self, outcome: CycleOutcome) {
        if !outcome.answer.is_empty() {
            self.answer = outcome.answer.clone();
        }
        self.error_occurred |= outcome.error_occurred;
        self.cycles.push(outcome);
    }
}

/// Runs a user turn against `history`, whose last message is normally the
/// user's input.
///
/// Cycles already committed stay in `history` even if a later cycle fails to
/// open its stream; the history is valid after every commit.
pub async fn run_turn(
    orchestrator: &Orchestrator<'_>,
    history: &mut Vec<Message>,
    renderer: &mut dyn Renderer,
    max_roundtrips: usize,
) -> Result<TurnResult, TurnError> {
    let mut result = TurnResult::default();

    for cycle in 0..=max_roundtrips {
        let outcome = orchestrator.run_cycle(history, renderer).await?;
        conversation::commit(history, &outcome);
        let called_tools = !outcome.tool_calls.is_empty();
        result.absorb(outcome);

        if !called_tools {
            break;
        }
        if cycle == max_roundtrips {
            debug!(max_roundtrips, "tool roundtrip limit reached");
        }
    }

    renderer.render_done();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::orchestrator::tests::{registry, search_call, text, tv_store, ScriptedModel};
    use crate::output::{RecordingRenderer, Section, UiEvent};
    use std::time::Duration;

    #[tokio::test]
    async fn test_turn_continues_after_tool_cycle() {
        let server = tv_store().await;
        let model = ScriptedModel::new(vec![
            vec![search_call("call_1", &["tv"])],
            vec![text("Try the Smart TV 55in.")],
        ]);
        let tools = registry(&server.uri());
        let orchestrator = Orchestrator::new(&model, &tools, "sys", 100);
        let mut ui = RecordingRenderer::default();
        let mut history = vec![Message::user("tv?")];

        let result = run_turn(&orchestrator, &mut history, &mut ui, 3).await.unwrap();

        assert_eq!(result.answer, "Try the Smart TV 55in.");
        assert!(!result.error_occurred);
        assert_eq!(result.cycles.len(), 2);
        let roles: Vec<_> = history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(conversation::validate(&history), Ok(()));
    }

    #[tokio::test]
    async fn test_turn_stops_at_roundtrip_limit() {
        let server = tv_store().await;
        let model = ScriptedModel::new(vec![
            vec![search_call("call_1", &["tv"])],
            vec![search_call("call_2", &["radio"])],
            vec![text("never reached")],
        ]);
        let tools = registry(&server.uri());
        let orchestrator = Orchestrator::new(&model, &tools, "sys", 100);
        let mut ui = RecordingRenderer::default();
        let mut history = vec![Message::user("tv?")];

        let result = run_turn(&orchestrator, &mut history, &mut ui, 1).await.unwrap();

        assert_eq!(result.cycles.len(), 2);
        assert_eq!(result.answer, "");
        assert_eq!(history.len(), 5);
        assert_eq!(conversation::validate(&history), Ok(()));
    }

    #[tokio::test]
    async fn test_turn_error_flag_survives_later_cycles() {
        let model = ScriptedModel::new(vec![
            vec![search_call("call_1", &["tv"])],
            vec![text("The store is unreachable.")],
        ]);
        let tools = registry("");
        let orchestrator = Orchestrator::new(&model, &tools, "sys", 100);
        let mut ui = RecordingRenderer::default();
        let mut history = vec![Message::user("tv?")];

        let result = run_turn(&orchestrator, &mut history, &mut ui, 3).await.unwrap();

        assert!(result.error_occurred);
        assert_eq!(result.answer, "The store is unreachable.");
        assert!(result.cycles[0].answer.contains("An error occurred while searching"));
    }

    #[tokio::test]
    async fn test_abandoned_turn_keeps_ui_and_commits_nothing() {
        let model = ScriptedModel::hanging(vec![vec![text("Let me look")]]);
        let tools = registry("https://shop.example.com");
        let orchestrator = Orchestrator::new(&model, &tools, "sys", 100);
        let mut ui = RecordingRenderer::default();
        let before = vec![Message::user("hi"), Message::assistant("Hello!")];
        let mut history = before.clone();
        let checkpoint = history.len();
        history.push(Message::user("tv?"));

        let turn = run_turn(&orchestrator, &mut history, &mut ui, 3);
        let abandoned = tokio::time::timeout(Duration::from_millis(50), turn).await;

        assert!(abandoned.is_err());
        assert_eq!(
            ui.events,
            vec![
                UiEvent::Update(Section::Answer),
                UiEvent::AnswerUpdated("Let me look".into()),
            ]
        );
        assert_eq!(history.len(), checkpoint + 1);
        history.truncate(checkpoint);
        assert_eq!(history, before);
    }
}
