//! Navigation Component
//!
//! Header bar with the brand, page links and the service address.

use leptos::*;
use leptos_router::*;

use crate::api;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-xl font-bold text-white">"Enterprise AI Assistant"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/" label="Chat" />
                        <NavLink href="/dashboard" label="Dashboard" />
                        <ServiceUrl />
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}

/// Editable service address, kept in local storage.
///
/// Blank means the page's own origin.
#[component]
fn ServiceUrl() -> impl IntoView {
    let (url, set_url) = create_signal(api::get_api_base());

    let on_change = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        api::set_api_base(value.trim());
        set_url.set(api::get_api_base());
    };

    view! {
        <input
            type="url"
            placeholder="same origin"
            title="Assistant service URL"
            class="ml-4 w-56 px-3 py-1 bg-gray-700 border border-gray-600 rounded-lg text-sm focus:outline-none focus:border-primary-500"
            prop:value=move || url.get()
            on:change=on_change
        />
    }
}
