//! Gemini API client struct, request building, and response parsing.

use crate::{AiError, ChatReply, Message, Role, TokenUsage};

use super::config::GeminiConfig;

pub(crate) const GEMINI_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn api_url(&self, stream: bool) -> String {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!("{}/{}:{}", GEMINI_API_BASE, self.config.model, method)
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let mut contents = Vec::new();

        for msg in messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
                Role::System => continue, // handled via systemInstruction
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content }]
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_output_tokens,
                "temperature": self.config.temperature,
            }
        });

        // System instruction
        for msg in messages {
            if msg.role == Role::System {
                body["systemInstruction"] = serde_json::json!({
                    "parts": [{ "text": msg.content }]
                });
                break;
            }
        }

        body
    }

    /// Parse a non-streaming Gemini response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<ChatReply, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        for part in &parts {
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }

        Ok(ChatReply {
            content,
            usage: parse_usage(&json),
        })
    }
}

pub(crate) fn parse_usage(json: &serde_json::Value) -> TokenUsage {
    TokenUsage {
        input_tokens: json["usageMetadata"]["promptTokenCount"]
            .as_u64()
            .unwrap_or(0),
        output_tokens: json["usageMetadata"]["candidatesTokenCount"]
            .as_u64()
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test-key", "gemini-test"))
    }

    #[test]
    fn api_url_selects_method() {
        let client = client();
        assert!(client.api_url(false).ends_with("gemini-test:generateContent"));
        assert!(client
            .api_url(true)
            .ends_with("gemini-test:streamGenerateContent"));
    }

    #[test]
    fn body_maps_roles_and_system_instruction() {
        let client = client();
        let messages = [
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];
        let body = client.build_request_body(&messages);

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "be brief"
        );
    }

    #[test]
    fn body_includes_generation_config() {
        let client = GeminiClient::new(
            GeminiConfig::new("k", "m")
                .with_max_output_tokens(128)
                .with_temperature(0.2),
        );
        let body = client.build_request_body(&[Message::user("x")]);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 128);
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
    }

    #[test]
    fn parses_reply_text_and_usage() {
        let client = client();
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "there" }] }
            }],
            "usageMetadata": { "promptTokenCount": 7, "candidatesTokenCount": 3 }
        });
        let reply = client.parse_response(json).unwrap();
        assert_eq!(reply.content, "Hello there");
        assert_eq!(reply.usage.input_tokens, 7);
        assert_eq!(reply.usage.output_tokens, 3);
        assert_eq!(reply.usage.total_tokens(), 10);
    }

    #[test]
    fn missing_candidates_is_parse_error() {
        let client = client();
        let err = client.parse_response(serde_json::json!({})).unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }

    #[test]
    fn empty_candidates_is_parse_error() {
        let client = client();
        let err = client
            .parse_response(serde_json::json!({ "candidates": [] }))
            .unwrap_err();
        assert!(matches!(err, AiError::ParseError(_)));
    }
}
