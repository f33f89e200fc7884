//! UI event sink for shopkeep.
//!
//! The orchestrator never draws anything itself. It emits [`UiEvent`]s that
//! replace ([`UiEvent::Update`]) or extend ([`UiEvent::Append`]) the visible
//! sections of the current turn, and republishes the running answer text.
//! [`StdoutRenderer`] turns those events into terminal output.

use colored::Colorize;
use std::io::{self, Write};

/// A renderable block of the turn's output.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Which tool is running and with what query.
    ToolBadge { tool: String, query: String },
    /// Placeholder shown while results are pending.
    SearchSkeleton,
    /// First image of each product found for `query`.
    Images { query: String, images: Vec<String> },
    /// The element that subsequent answer text renders into.
    Answer,
    ErrorCard { message: String },
}

/// One append/update notification.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Update(Section),
    Append(Section),
    /// The full answer text so far.
    AnswerUpdated(String),
}

/// Receives UI events in emission order.
pub trait Renderer {
    fn emit(&mut self, event: UiEvent);

    /// Called when a model cycle starts; its answer text starts empty.
    fn begin_cycle(&mut self) {}

    /// Called once the whole turn (all cycles) is finished.
    fn render_done(&mut self) {}
}

/// Renders UI events directly to stdout.
///
/// Answer text is printed incrementally: only the part of each
/// [`UiEvent::AnswerUpdated`] not yet shown is written, then flushed.
pub struct StdoutRenderer {
    printed: usize,
    answer_open: bool,
}

impl StdoutRenderer {
    pub fn new() -> Self {
        Self {
            printed: 0,
            answer_open: false,
        }
    }

    fn rule_width() -> usize {
        terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80)
            .clamp(20, 100)
    }

    fn heading(title: &str) {
        let width = Self::rule_width();
        let pad = width.saturating_sub(title.len() + 4);
        println!("{} {} {}", "──".dimmed(), title.bold(), "─".repeat(pad).dimmed());
    }

    fn render_section(&mut self, section: Section) {
        match section {
            Section::ToolBadge { tool, query } => {
                self.close_answer();
                println!("{} {}", format!("[{}]", tool).cyan().bold(), query.dimmed());
            }
            Section::SearchSkeleton => println!("{}", "  searching...".dimmed()),
            Section::Images { query, images } => {
                self.close_answer();
                Self::heading("Images");
                if images.is_empty() {
                    println!("  {}", format!("no images for \"{query}\"").dimmed());
                }
                for src in images {
                    println!("  {}", src.blue().underline());
                }
            }
            Section::Answer => {
                if !self.answer_open {
                    Self::heading("Answer");
                    self.answer_open = true;
                }
            }
            Section::ErrorCard { message } => {
                self.close_answer();
                eprintln!("{} {}", "error:".red().bold(), message);
            }
        }
    }

    fn close_answer(&mut self) {
        if self.answer_open {
            println!();
            self.answer_open = false;
        }
    }
}

impl Renderer for StdoutRenderer {
    fn begin_cycle(&mut self) {
        self.printed = 0;
    }

    fn emit(&mut self, event: UiEvent) {
        match event {
            UiEvent::Update(section) | UiEvent::Append(section) => self.render_section(section),
            UiEvent::AnswerUpdated(text) => {
                if let Some(fresh) = text.get(self.printed..) {
                    print!("{}", fresh);
                    io::stdout().flush().ok();
                }
                self.printed = text.len();
            }
        }
    }

    fn render_done(&mut self) {
        self.close_answer();
        println!();
    }
}

/// Keeps every event for later inspection.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Vec<UiEvent>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn emit(&mut self, event: UiEvent) {
        self.events.push(event);
    }
}
