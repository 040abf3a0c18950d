//! Server-Sent Events (SSE) parsing.
//!
//! The Gemini streaming endpoint (`streamGenerateContent?alt=sse`) emits
//! newline-delimited SSE events. The parser here is incremental and
//! line-oriented so the pure parsing logic stays testable without a
//! network response.

use futures_util::StreamExt;
use tokio::io::AsyncBufReadExt;
use tokio_util::io::StreamReader;

use crate::AiError;

/// A single parsed SSE event.
#[derive(Debug, Clone)]
pub struct SseEvent {
    /// Value of the `event:` field, when present.
    pub event: Option<String>,
    /// Accumulated `data:` payload (multi-line data joined with `\n`).
    pub data: String,
}

/// Incremental SSE line parser. Feed lines in order; a completed event is
/// returned when its terminating blank line arrives.
#[derive(Debug, Default)]
pub struct SseParser {
    event: Option<String>,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the stream.
    pub fn push_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.take_event();
        }

        if let Some(event_type) = line.strip_prefix("event: ") {
            self.event = Some(event_type.to_string());
        } else if let Some(data) = line.strip_prefix("data: ") {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(data);
        }
        // Other fields (id:, retry:, comments) are ignored.
        None
    }

    /// Flush a trailing event that was never terminated by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.take_event()
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        Some(SseEvent {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}

/// Drive an [`SseParser`] over a reqwest response body, calling
/// `on_event` for each completed event.
pub async fn parse_sse_stream(
    response: reqwest::Response,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    let mut lines = reader.lines();

    let mut parser = SseParser::new();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AiError::NetworkError(e.to_string()))?
    {
        if let Some(event) = parser.push_line(&line) {
            on_event(event);
        }
    }
    if let Some(event) = parser.finish() {
        on_event(event);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(lines: &[&str]) -> Vec<SseEvent> {
        let mut parser = SseParser::new();
        let mut events = Vec::new();
        for line in lines {
            if let Some(event) = parser.push_line(line) {
                events.push(event);
            }
        }
        if let Some(event) = parser.finish() {
            events.push(event);
        }
        events
    }

    #[test]
    fn parses_single_event() {
        let events = collect(&["data: {\"x\":1}", ""]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"x\":1}");
        assert!(events[0].event.is_none());
    }

    #[test]
    fn parses_event_type() {
        let events = collect(&["event: delta", "data: hello", ""]);
        assert_eq!(events[0].event.as_deref(), Some("delta"));
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn joins_multiline_data() {
        let events = collect(&["data: line one", "data: line two", ""]);
        assert_eq!(events[0].data, "line one\nline two");
    }

    #[test]
    fn flushes_unterminated_trailing_event() {
        let events = collect(&["data: tail"]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "tail");
    }

    #[test]
    fn ignores_comments_and_other_fields() {
        let events = collect(&[": keepalive", "id: 7", "data: payload", ""]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "payload");
    }

    #[test]
    fn blank_line_without_data_yields_nothing() {
        let events = collect(&["event: noop", "", "data: real", ""]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "real");
        // The orphaned event type was discarded with its empty event.
        assert!(events[0].event.is_none());
    }
}
