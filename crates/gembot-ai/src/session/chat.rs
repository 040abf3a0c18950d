//! Async chat methods for Session (send_message + streaming).

use crate::{AiError, ChatClient, Message, Role};

use super::manager::Session;
use super::types::BusyGuard;

impl Session {
    /// Add a user message and get the assistant's response.
    ///
    /// On failure the user turn stays in history and the error is
    /// returned; no assistant turn is recorded.
    pub async fn chat(
        &mut self,
        client: &dyn ChatClient,
        user_message: impl Into<String>,
    ) -> Result<String, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(Message {
            role: Role::User,
            content: user_message.into(),
        });

        let messages = self.build_messages();
        let reply = client.send_message(&messages).await?;

        self.usage.add(&reply.usage);
        self.messages.push(Message {
            role: Role::Assistant,
            content: reply.content.clone(),
        });

        Ok(reply.content)
    }

    /// Send a message with streaming, returning the full response.
    pub async fn chat_streaming(
        &mut self,
        client: &dyn ChatClient,
        user_message: impl Into<String>,
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<String, AiError> {
        let _guard = BusyGuard::acquire(&self.busy)?;

        self.messages.push(Message {
            role: Role::User,
            content: user_message.into(),
        });

        let messages = self.build_messages();
        let reply = client.send_message_streaming(&messages, on_chunk).await?;

        self.usage.add(&reply.usage);
        self.messages.push(Message {
            role: Role::Assistant,
            content: reply.content.clone(),
        });

        Ok(reply.content)
    }
}
