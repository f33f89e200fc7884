//! Terminal formatting for stored conversation messages (`/history`).

use colored::Colorize;

use crate::message::{Content, Message, Part, Role, ToolPayload};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    let mut lines = vec![format_role_label(msg.role)];
    if let Content::Text(text) = &msg.content {
        lines.push(format_text(text, msg.role));
    }
    for part in msg.parts() {
        let line = match part {
            Part::Text { text } if text.is_empty() => continue,
            Part::Text { text } => format_text(text, msg.role),
            Part::ToolCall(call) => {
                format!("{} {}({})", "→".cyan(), call.name, call.arguments)
            }
            Part::ToolResult(result) => {
                let summary = match &result.payload {
                    ToolPayload::Products { products } => {
                        format!("{} products", products.len())
                    }
                    ToolPayload::Error { message } => message.red().to_string(),
                };
                format!("{} {}: {}", "←".yellow(), result.name, summary)
            }
        };
        lines.push(line);
    }
    lines.join("\n")
}

fn format_text(text: &str, role: Role) -> String {
    match role {
        Role::Assistant => render_markdown_lite(text),
        _ => text.to_string(),
    }
}

fn format_role_label(role: Role) -> String {
    let label = format!("{role}:");
    match role {
        Role::User => label.green().bold().to_string(),
        Role::Assistant => label.cyan().bold().to_string(),
        Role::Tool => label.yellow().to_string(),
    }
}

/// Minimal markdown renderer for terminal output.
/// Handles **bold**, `inline code`, and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut output = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(lang) = line.strip_prefix("```") {
            in_code_block = !in_code_block;
            if in_code_block && !lang.is_empty() {
                output.push(format!("  {}", lang.dimmed()));
            }
            continue;
        }
        if in_code_block {
            output.push(format!("  {}", line.dimmed()));
        } else {
            output.push(render_inline(line));
        }
    }

    output.join("\n")
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                result.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                result.push_str(&after[..end].dimmed().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ToolCall, ToolResult};
    use serde_json::json;

    #[test]
    fn inline_markup_is_consumed() {
        colored::control::set_override(false);
        assert_eq!(render_inline("a **b** `c` d"), "a b c d");
        assert_eq!(render_inline("**open"), "**open");
        assert_eq!(render_markdown_lite("```rust\nfn x() {}\n```\nok"), "  rust\n  fn x() {}\nok");
    }

    #[test]
    fn tool_parts_are_summarized() {
        colored::control::set_override(false);
        let call = ToolCall {
            id: "a".into(),
            name: "search".into(),
            arguments: json!({"keywords": ["tv"]}),
            call_id: None,
        };
        let msg = Message::assistant_with_calls("", &[call]);
        assert_eq!(
            format_message(&msg),
            "shopkeep:\n→ search({\"keywords\":[\"tv\"]})"
        );

        let msg = Message::tool_results(&[ToolResult {
            id: "a".into(),
            name: "search".into(),
            payload: ToolPayload::Error {
                message: "boom".into(),
            },
        }]);
        assert_eq!(format_message(&msg), "tool:\n← search: boom");

        assert_eq!(format_message(&Message::user("tv?")), "you:\ntv?");
    }
}
