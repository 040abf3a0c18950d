//! ChatClient trait implementation for GeminiClient (send_message + streaming).

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::{parse_sse_stream, SseEvent};
use crate::{AiError, ChatClient, ChatReply, Message, TokenUsage};

use super::client::{parse_usage, GeminiClient};

#[async_trait]
impl ChatClient for GeminiClient {
    async fn send_message(&self, messages: &[Message]) -> Result<ChatReply, AiError> {
        let body = self.build_request_body(messages);
        let url = self.api_url(false);

        debug!(model = %self.config.model, "Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }

    async fn send_message_streaming(
        &self,
        messages: &[Message],
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> Result<ChatReply, AiError> {
        let body = self.build_request_body(messages);
        let url = format!("{}?alt=sse", self.api_url(true));

        debug!(model = %self.config.model, "Gemini API streaming request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let mut full_content = String::new();
        let mut usage = TokenUsage::default();

        parse_sse_stream(response, |event: SseEvent| {
            let Ok(data) = serde_json::from_str::<serde_json::Value>(&event.data) else {
                return;
            };

            let mut chunk = String::new();
            if let Some(candidates) = data["candidates"].as_array() {
                for candidate in candidates {
                    if let Some(parts) = candidate["content"]["parts"].as_array() {
                        for part in parts {
                            if let Some(t) = part["text"].as_str() {
                                if !t.is_empty() {
                                    chunk.push_str(t);
                                    full_content.push_str(t);
                                }
                            }
                        }
                    }
                }
            }

            // Usage arrives cumulatively; the last event wins.
            if data.get("usageMetadata").is_some() {
                usage = parse_usage(&data);
            }

            if !chunk.is_empty() {
                on_chunk(chunk);
            }
        })
        .await?;

        Ok(ChatReply {
            content: full_content,
            usage,
        })
    }
}
