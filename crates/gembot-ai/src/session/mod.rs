//! Conversation session management.
//!
//! A `Session` owns the conversation history for one chat client and
//! forwards turns to a `ChatClient`.

mod chat;
mod manager;
mod types;

pub use manager::Session;
