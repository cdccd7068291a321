//! Concierge Web Client
//!
//! Browser front end for the Enterprise AI Assistant, built with Leptos (WASM).
//!
//! # Features
//!
//! - Chat with rolling conversation history and highlighted code replies
//! - Tier and severity selection per query
//! - Metrics dashboard drawn on canvas
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The session controller and chart specs come from the
//! `concierge` crate; this crate supplies the signal-backed renderer, the
//! canvas chart surface and the `gloo-net` transport.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
