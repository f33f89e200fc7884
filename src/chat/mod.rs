//! Interactive chat REPL for shopkeep.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). The full conversation history, including
//! earlier tool calls and results, is sent with each turn.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::agent;
use crate::cli::Assistant;
use crate::config::Config;
use crate::message::Message;
use crate::output::{Renderer, StdoutRenderer};
use crate::provider::ModelSelection;

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C** at the prompt: cancels current input, stays in REPL
/// - **Ctrl+C** during an answer: abandons the turn; nothing is added to history
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/shopkeep/chat_history.txt`
pub async fn run_chat(config: &Config, selection: &ModelSelection) -> Result<()> {
    let assistant = Assistant::from_config(config, selection)?;
    let orchestrator = assistant.orchestrator();
    let mut history: Vec<Message> = Vec::new();

    println!(
        "{} [store: {}] [model: {}] (Ctrl+D to exit)",
        "shopkeep chat".bold().cyan(),
        config.store_name().yellow(),
        assistant.model.yellow(),
    );
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    if let commands::CommandAction::Unknown(cmd) =
                        commands::handle_slash_command(&line, &mut history)
                    {
                        println!("{} Unknown command: {}", "?".yellow(), cmd);
                    }
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let checkpoint = history.len();
                history.push(Message::user(&line));
                println!();

                let mut renderer = StdoutRenderer::new();
                let outcome = tokio::select! {
                    result = agent::run_turn(
                        &orchestrator,
                        &mut history,
                        &mut renderer,
                        assistant.max_roundtrips,
                    ) => Some(result),
                    _ = tokio::signal::ctrl_c() => None,
                };

                match outcome {
                    Some(Ok(result)) => {
                        if result.error_occurred {
                            eprintln!(
                                "{}",
                                "Some searches failed; the answer may be incomplete.".yellow()
                            );
                        }
                    }
                    Some(Err(e)) => {
                        // Drop the failed turn so the user can retry
                        history.truncate(checkpoint);
                        eprintln!("{} {}", "error:".red().bold(), e);
                    }
                    None => {
                        history.truncate(checkpoint);
                        renderer.render_done();
                        info!("turn abandoned");
                        println!("{}", "cancelled.".dimmed());
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(())
}
