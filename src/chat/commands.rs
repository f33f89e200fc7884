//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/history`, `/clear` and `/help`. Returns a [`CommandAction`]
//! so the REPL loop can decide how to proceed.

use colored::Colorize;

use crate::format;
use crate::message::Message;

/// Action returned by slash command handling.
#[derive(Debug, PartialEq)]
pub(crate) enum CommandAction {
    /// Command was handled; continue the REPL loop.
    Continue,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command against the conversation history.
pub(crate) fn handle_slash_command(command: &str, history: &mut Vec<Message>) -> CommandAction {
    match command {
        "/history" => {
            if history.is_empty() {
                println!("{}", "No messages yet.".dimmed());
            }
            for msg in history.iter() {
                println!("{}", format::format_message(msg));
                println!();
            }
            CommandAction::Continue
        }
        "/clear" => {
            history.clear();
            println!("{}", "History cleared.".dimmed());
            CommandAction::Continue
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - clear conversation", "/clear".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - abandon the current answer", "Ctrl+C".cyan());
            println!("  {} - exit", "Ctrl+D".cyan());
            CommandAction::Continue
        }
        _ => CommandAction::Unknown(command.to_string()),
    }
}
