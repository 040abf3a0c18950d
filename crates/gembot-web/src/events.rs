//! Events emitted on the chat SSE stream.

use serde::Serialize;

/// One event on the reply stream for a chat turn.
///
/// Upstream failures are not an event kind of their own: the reply text
/// of a failed turn is the stringified error (`"Error: ..."`), delivered
/// through the normal `Done` event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Tells the client which session id its conversation lives under.
    Session { session_id: String },
    /// A streamed fragment of the reply.
    Chunk { text: String },
    /// The turn finished; `reply` is the full text.
    Done { reply: String },
}

impl ChatEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ChatEvent::Session { .. } => "session",
            ChatEvent::Chunk { .. } => "chunk",
            ChatEvent::Done { .. } => "done",
        }
    }
}
