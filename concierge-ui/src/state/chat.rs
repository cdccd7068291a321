//! Chat State
//!
//! Reactive state behind the chat page. [`SignalRenderer`] lets the
//! session controller drive the page by writing to these signals.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;

use concierge::chat::{ChatSession, RenderedMessage, Renderer};

/// Tiers offered in the tier selector
pub const TIERS: &[&str] = &["free", "premium", "enterprise"];

/// Severities offered in the severity selector
pub const SEVERITIES: &[&str] = &["low", "medium", "high", "critical"];

/// The page's one chat session, shared via context
pub type SharedSession = Rc<RefCell<ChatSession<SignalRenderer>>>;

/// Chat page state shared via context
#[derive(Clone, Copy)]
pub struct ChatState {
    /// Transcript in display order, oldest first
    pub messages: RwSignal<Vec<RenderedMessage>>,

    pub typing: RwSignal<bool>,

    /// Contents of the query input
    pub input: RwSignal<String>,

    pub tier: RwSignal<String>,
    pub severity: RwSignal<String>,

    /// Scrollable transcript container
    pub window: NodeRef<html::Div>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            messages: create_rw_signal(Vec::new()),
            typing: create_rw_signal(false),
            input: create_rw_signal(String::new()),
            tier: create_rw_signal(TIERS[0].to_string()),
            severity: create_rw_signal(SEVERITIES[0].to_string()),
            window: create_node_ref::<html::Div>(),
        }
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide chat state and a greeted session to the component tree
pub fn provide_chat_state() {
    let state = ChatState::new();
    let mut session = ChatSession::new(SignalRenderer::new(state));
    session.clear();

    provide_context(state);
    provide_context::<SharedSession>(Rc::new(RefCell::new(session)));
}

/// [`Renderer`] that writes into [`ChatState`] signals
#[derive(Clone, Copy)]
pub struct SignalRenderer {
    state: ChatState,
}

impl SignalRenderer {
    pub fn new(state: ChatState) -> Self {
        Self { state }
    }
}

impl Renderer for SignalRenderer {
    fn append_message(&mut self, message: RenderedMessage) {
        self.state.messages.update(|messages| messages.push(message));
    }

    fn show_typing_indicator(&mut self) {
        self.state.typing.set(true);
    }

    fn hide_typing_indicator(&mut self) {
        self.state.typing.set(false);
    }

    fn clear_transcript(&mut self) {
        self.state.messages.update(Vec::clear);
    }

    fn clear_input(&mut self) {
        self.state.input.set(String::new());
    }

    fn scroll_to_bottom(&mut self) {
        // Wait for the new message to be laid out
        let window = self.state.window;
        request_animation_frame(move || {
            if let Some(el) = window.get_untracked() {
                el.set_scroll_top(el.scroll_height());
            }
        });
    }
}
