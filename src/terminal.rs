//! Terminal transcript
//!
//! [`Renderer`] that prints the conversation to a terminal. Assistant
//! Markdown is shown with highlighted code blocks when colour is enabled.

use std::io::Write;

use crate::chat::{MessageFormat, RenderedMessage, Renderer, Role};
use crate::markdown;

const TYPING: &str = "assistant is typing...";
const CLEAR_LINE: &str = "\r\x1b[2K";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalRenderer<W: Write> {
    out: W,
    ansi: bool,
    indicator: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// `ansi` enables colours, cursor control and screen clearing
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            indicator: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn format(&self, message: &RenderedMessage) -> String {
        let prefix = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };

        // Server and user text never reach the terminal with raw escapes
        let source = markdown::strip_control(&message.source);
        let body = match message.format {
            MessageFormat::Markdown if self.ansi => markdown::to_ansi(&source),
            _ => source,
        };

        let mut text = format!("{} > {}", prefix, body.trim_end());
        text.push_str("\n\n");
        text
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn append_message(&mut self, message: RenderedMessage) {
        let mut text = String::new();
        // The indicator line is transient; drop it before printing above it
        if self.indicator && self.ansi {
            text.push_str(CLEAR_LINE);
        }
        text.push_str(&self.format(&message));
        self.emit(&text);
    }

    fn show_typing_indicator(&mut self) {
        if self.indicator {
            return;
        }
        self.indicator = true;
        if self.ansi {
            self.emit(TYPING);
        } else {
            self.emit(&format!("{}\n", TYPING));
        }
    }

    fn hide_typing_indicator(&mut self) {
        if !self.indicator {
            return;
        }
        self.indicator = false;
        if self.ansi {
            self.emit(CLEAR_LINE);
        }
    }

    fn clear_transcript(&mut self) {
        if self.ansi {
            self.emit(CLEAR_SCREEN);
        } else {
            self.emit("--- conversation cleared ---\n\n");
        }
    }
}
