//! Session struct and conversation management.

use std::sync::atomic::AtomicBool;

use crate::{Message, Role, TokenUsage};

/// A conversation session with owned message history.
pub struct Session {
    /// Conversation message history.
    pub(super) messages: Vec<Message>,
    /// System prompt (prepended to every API call).
    pub(super) system_prompt: Option<String>,
    /// Cumulative token usage across turns.
    pub(super) usage: TokenUsage,
    /// Whether the session is currently processing a request.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            usage: TokenUsage::default(),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub(crate) fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message {
                role: Role::System,
                content: system.clone(),
            });
        }
        msgs.extend(self.messages.clone());
        msgs
    }

    /// Get the full conversation history.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Cumulative token usage.
    pub fn usage(&self) -> &TokenUsage {
        &self.usage
    }

    /// Clear conversation history and usage.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.usage = TokenUsage::default();
    }

    /// Number of messages in history.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.usage().total_tokens(), 0);
    }

    #[test]
    fn system_prompt_prepends_without_joining_history() {
        let mut session = Session::new().with_system_prompt("be brief");
        session.messages.push(Message::user("hi"));

        let built = session.build_messages();
        assert_eq!(built.len(), 2);
        assert_eq!(built[0].role, Role::System);
        // The prompt never lands in the stored history.
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn clear_resets_history_and_usage() {
        let mut session = Session::new();
        session.messages.push(Message::user("hi"));
        session.usage.add(&TokenUsage {
            input_tokens: 5,
            output_tokens: 7,
        });

        session.clear();
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.usage().total_tokens(), 0);
    }
}
