//! Google Gemini API client.
//!
//! Implements the `ChatClient` trait against the Generative Language API.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
