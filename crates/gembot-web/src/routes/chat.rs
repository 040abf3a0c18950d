//! Chat API endpoints with SSE reply streaming.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::Stream;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use gembot_ai::Message;
use gembot_common::SessionId;

use crate::services::ChatService;
use crate::{ChatEvent, WebError};

/// Shared state for chat routes.
pub type ChatState = Arc<ChatService>;

/// Request body for chat and reset.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the server assigns an id and
    /// announces it on the stream.
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session_id: Option<String>,
}

pub fn chat_routes(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/reset", post(reset_handler))
        .route("/api/history/{id}", get(history_handler))
        .with_state(state)
}

/// Handle one chat turn and stream the reply as SSE.
async fn chat_handler(
    State(service): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, WebError> {
    if request.message.trim().is_empty() {
        return Err(WebError::Chat("message cannot be empty".to_string()));
    }
    let session_id = resolve_session_id(request.session_id.as_deref())?;

    let (tx, rx) = mpsc::unbounded_channel::<ChatEvent>();
    let _ = tx.send(ChatEvent::Session {
        session_id: session_id.to_string(),
    });

    // Run the turn in the background; the stream closes once every
    // sender is gone, which happens right after the Done event.
    let message = request.message.clone();
    tokio::spawn(async move {
        let chunk_tx = tx.clone();
        let on_chunk = Box::new(move |text: String| {
            let _ = chunk_tx.send(ChatEvent::Chunk { text });
        });
        let reply = service.respond(&session_id, &message, on_chunk).await;
        let _ = tx.send(ChatEvent::Done { reply });
    });

    let stream = UnboundedReceiverStream::new(rx).map(|event| {
        Ok(Event::default()
            .event(event.event_type())
            .data(serde_json::to_string(&event).unwrap_or_default()))
    });

    Ok(Sse::new(stream))
}

/// Start a new conversation, discarding any existing history for the id.
async fn reset_handler(
    State(service): State<ChatState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<serde_json::Value>, WebError> {
    let session_id = resolve_session_id(request.session_id.as_deref())?;
    let history = service.reset(&session_id).await;

    Ok(Json(serde_json::json!({
        "session_id": session_id.to_string(),
        "history": history,
    })))
}

/// Full history for a session; an unknown id yields an empty list.
async fn history_handler(
    State(service): State<ChatState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, WebError> {
    let session_id: SessionId = id.parse().map_err(|_| WebError::Session(id.clone()))?;
    Ok(Json(service.history(&session_id).await))
}

fn resolve_session_id(raw: Option<&str>) -> Result<SessionId, WebError> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| WebError::Session(raw.to_string())),
        None => Ok(SessionId::new()),
    }
}
