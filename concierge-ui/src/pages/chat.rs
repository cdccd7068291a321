//! Chat Page
//!
//! Conversation with the assistant. The page only collects input and wires
//! the form to the shared session; everything it shows is written by the
//! session through [`crate::state::SignalRenderer`].

use leptos::*;
use std::rc::Rc;

use concierge::chat::ChatTransport;
use concierge::SubmitRejected;

use crate::api::HttpTransport;
use crate::components::{MessageBubble, TypingIndicator};
use crate::state::{ChatState, SharedSession, SEVERITIES, TIERS};

/// Chat page component
#[component]
pub fn Chat() -> impl IntoView {
    let state = use_context::<ChatState>().expect("ChatState not found");
    let session = use_context::<SharedSession>().expect("SharedSession not found");

    let submit_session = Rc::clone(&session);
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let begun = submit_session.borrow_mut().begin_submit(
            &state.input.get_untracked(),
            &state.tier.get_untracked(),
            &state.severity.get_untracked(),
        );
        let turn = match begun {
            Ok(turn) => turn,
            Err(SubmitRejected::EmptyQuery) => return,
            Err(e) => {
                web_sys::console::warn_1(&format!("Query not submitted: {}", e).into());
                return;
            }
        };

        let session = Rc::clone(&submit_session);
        spawn_local(async move {
            let transport = HttpTransport::from_storage();
            let result = transport.send(turn.request()).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Error fetching chat response: {}", e).into());
            }
            session.borrow_mut().complete_submit(turn, result);
        });
    };

    let clear_session = Rc::clone(&session);
    let on_clear = move |_| clear_session.borrow_mut().clear();

    view! {
        <div class="max-w-3xl mx-auto space-y-4">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Assistant"</h1>
                    <p class="text-gray-400 mt-1">"Ask about your account, billing or integrations"</p>
                </div>
                <button
                    type="button"
                    on:click=on_clear
                    class="px-4 py-2 rounded-lg text-sm font-medium bg-gray-700 text-gray-300 hover:bg-gray-600 transition-colors"
                >
                    "Clear"
                </button>
            </div>

            <div
                id="chat-window"
                node_ref=state.window
                class="chat-window bg-gray-800 rounded-xl p-6 h-[60vh] overflow-y-auto space-y-4"
            >
                {move || {
                    state.messages.get()
                        .into_iter()
                        .map(|message| view! { <MessageBubble message=message /> })
                        .collect_view()
                }}
                <Show when=move || state.typing.get()>
                    <TypingIndicator />
                </Show>
            </div>

            <form id="chat-form" on:submit=on_submit class="space-y-3">
                <div class="flex gap-4">
                    <Selector id="user-tier" label="Tier" options=TIERS value=state.tier />
                    <Selector id="severity-level" label="Severity" options=SEVERITIES value=state.severity />
                </div>

                <div class="flex gap-3">
                    <input
                        id="user-input"
                        type="text"
                        autocomplete="off"
                        placeholder="Type your question..."
                        class="flex-1 px-4 py-2 bg-gray-700 border border-gray-600 rounded-lg focus:outline-none focus:border-primary-500"
                        prop:value=move || state.input.get()
                        on:input=move |ev| state.input.set(event_target_value(&ev))
                    />
                    <button
                        id="send-btn"
                        type="submit"
                        disabled=move || state.typing.get()
                        class="px-6 py-2 bg-primary-600 hover:bg-primary-700 disabled:opacity-50 rounded-lg font-medium transition-colors"
                    >
                        "Send"
                    </button>
                </div>
            </form>
        </div>
    }
}

/// Labelled dropdown bound to a string signal
#[component]
fn Selector(
    id: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <label class="flex items-center gap-2 text-sm text-gray-300">
            {label}
            <select
                id=id
                class="px-3 py-1 bg-gray-700 border border-gray-600 rounded-lg focus:outline-none focus:border-primary-500"
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                {options
                    .iter()
                    .map(|&option| {
                        view! {
                            <option value=option selected=move || value.get() == option>
                                {title_case(option)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </label>
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("premium"), "Premium");
        assert_eq!(title_case("critical"), "Critical");
        assert_eq!(title_case(""), "");
    }
}
