//! API Module
//!
//! `gloo-net` transport for the assistant service.

pub mod client;

pub use client::{get_api_base, set_api_base, HttpTransport};
