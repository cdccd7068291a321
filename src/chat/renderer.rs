//! Transcript Rendering
//!
//! The controller never touches a display directly; it talks to a
//! [`Renderer`]. Front ends provide their own (terminal, Leptos signals) and
//! tests use the in-memory [`Transcript`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::history::Role;
use crate::markdown;

/// How a message body was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// Literal text, never interpreted as markup
    Plain,
    /// Markdown converted to HTML with highlighted code
    Markdown,
}

/// A message ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    pub role: Role,
    pub format: MessageFormat,
    /// Text as written by the user or the assistant
    pub source: String,
    /// Safe HTML for web transcripts
    pub html: String,
    pub rendered_at: DateTime<Utc>,
}

impl RenderedMessage {
    pub fn new(text: &str, role: Role, parse_markdown: bool) -> Self {
        if parse_markdown {
            Self::markdown(text, role)
        } else {
            Self::plain(text, role)
        }
    }

    pub fn plain(text: &str, role: Role) -> Self {
        Self {
            role,
            format: MessageFormat::Plain,
            source: text.to_string(),
            html: format!("<p>{}</p>", markdown::escape(text)),
            rendered_at: Utc::now(),
        }
    }

    pub fn markdown(text: &str, role: Role) -> Self {
        Self {
            role,
            format: MessageFormat::Markdown,
            source: text.to_string(),
            html: markdown::to_html(text),
            rendered_at: Utc::now(),
        }
    }

    /// CSS classes used by the web transcript (`message user-message`, ...)
    pub fn css_class(&self) -> &'static str {
        match self.role {
            Role::User => "message user-message",
            Role::Assistant => "message assistant-message",
        }
    }
}

/// Display capability used by the chat controller
pub trait Renderer {
    /// Append a message at the bottom of the transcript
    fn append_message(&mut self, message: RenderedMessage);

    fn show_typing_indicator(&mut self);

    fn hide_typing_indicator(&mut self);

    /// Remove every rendered message
    fn clear_transcript(&mut self);

    /// Empty the query input, if the front end has one
    fn clear_input(&mut self) {}

    fn scroll_to_bottom(&mut self) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn append_message(&mut self, message: RenderedMessage) {
        (**self).append_message(message)
    }

    fn show_typing_indicator(&mut self) {
        (**self).show_typing_indicator()
    }

    fn hide_typing_indicator(&mut self) {
        (**self).hide_typing_indicator()
    }

    fn clear_transcript(&mut self) {
        (**self).clear_transcript()
    }

    fn clear_input(&mut self) {
        (**self).clear_input()
    }

    fn scroll_to_bottom(&mut self) {
        (**self).scroll_to_bottom()
    }
}

/// In-memory transcript
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<RenderedMessage>,
    indicator: bool,
    input_clears: usize,
    scrolls: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[RenderedMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&RenderedMessage> {
        self.messages.last()
    }

    pub fn typing_indicator_visible(&self) -> bool {
        self.indicator
    }

    /// Number of indicator elements present (0 or 1)
    pub fn indicator_count(&self) -> usize {
        usize::from(self.indicator)
    }

    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls
    }
}

impl Renderer for Transcript {
    fn append_message(&mut self, message: RenderedMessage) {
        self.messages.push(message);
    }

    fn show_typing_indicator(&mut self) {
        self.indicator = true;
    }

    fn hide_typing_indicator(&mut self) {
        self.indicator = false;
    }

    fn clear_transcript(&mut self) {
        self.messages.clear();
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message_is_literal() {
        let message = RenderedMessage::new("<script>alert('x')</script>", Role::User, false);

        assert_eq!(message.format, MessageFormat::Plain);
        assert_eq!(message.source, "<script>alert('x')</script>");
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_markdown_message() {
        let message = RenderedMessage::new("```python\nprint('hi')\n```", Role::Assistant, true);

        assert_eq!(message.format, MessageFormat::Markdown);
        assert!(message.html.contains("language-python"));
        assert_eq!(message.css_class(), "message assistant-message");
    }

    #[test]
    fn test_transcript_keeps_append_order() {
        let mut transcript = Transcript::new();
        transcript.append_message(RenderedMessage::plain("first", Role::User));
        transcript.append_message(RenderedMessage::plain("second", Role::Assistant));

        let sources: Vec<_> = transcript.messages().iter().map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["first", "second"]);

        transcript.clear_transcript();
        assert!(transcript.messages().is_empty());
    }
}
