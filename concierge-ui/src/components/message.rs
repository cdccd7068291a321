//! Transcript Components
//!
//! Chat bubbles and the typing indicator.

use leptos::*;

use concierge::chat::{MessageFormat, RenderedMessage};

/// One transcript entry.
///
/// Plain messages are inserted as text nodes. Markdown replies carry HTML
/// that was escaped and highlighted by the session renderer.
#[component]
pub fn MessageBubble(message: RenderedMessage) -> impl IntoView {
    let class = message.css_class();
    let time = message.rendered_at.format("%H:%M").to_string();

    let body = match message.format {
        MessageFormat::Plain => view! { <p>{message.source}</p> }.into_view(),
        MessageFormat::Markdown => view! { <div class="markdown" inner_html=message.html /> }.into_view(),
    };

    view! {
        <div class=class title=time>
            {body}
        </div>
    }
}

/// Three-dot "assistant is typing" marker
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div id="typing-indicator" class="message assistant-message typing-indicator">
            <span />
            <span />
            <span />
        </div>
    }
}
