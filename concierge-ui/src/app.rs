//! App Root Component
//!
//! Main application component with routing and the chat state provider.

use leptos::*;
use leptos_router::*;

use crate::components::Nav;
use crate::pages::{Chat, Dashboard};
use crate::state::provide_chat_state;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Chat state outlives page switches so the transcript survives navigation
    provide_chat_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Chat />
                        <Route path="/dashboard" view=Dashboard />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"There is nothing at this address."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Back to chat"
            </A>
        </div>
    }
}
