//! Chat service: one conversation session per connected client.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use gembot_ai::{ChatClient, Message, Session};
use gembot_common::SessionId;

type SharedSession = Arc<Mutex<Session>>;

/// Holds the model client and the per-client session store. A session is
/// created on first use of its id and replaced wholesale on reset.
pub struct ChatService {
    client: Arc<dyn ChatClient>,
    sessions: Mutex<HashMap<SessionId, SharedSession>>,
}

impl ChatService {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Send one user message and return the reply text.
    ///
    /// Upstream failures are swallowed into the reply: the returned text
    /// is `"Error: <message>"` and the process carries on. `on_chunk`
    /// receives streamed fragments of a successful reply.
    pub async fn respond(
        &self,
        session_id: &SessionId,
        message: &str,
        on_chunk: Box<dyn Fn(String) + Send + Sync>,
    ) -> String {
        let session = self.session(session_id).await;
        let mut session = session.lock().await;

        match session.chat_streaming(self.client.as_ref(), message, on_chunk).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %session_id, error = %e, "chat turn failed");
                format!("Error: {e}")
            }
        }
    }

    /// Discard the session's history and start fresh. Returns the (empty)
    /// history of the new session.
    pub async fn reset(&self, session_id: &SessionId) -> Vec<Message> {
        debug!(session = %session_id, "resetting session");
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session_id.clone(), Arc::new(Mutex::new(Session::new())));
        Vec::new()
    }

    /// The conversation history for a session; empty when the id is
    /// unknown.
    pub async fn history(&self, session_id: &SessionId) -> Vec<Message> {
        let sessions = self.sessions.lock().await;
        match sessions.get(session_id) {
            Some(session) => session.lock().await.messages().to_vec(),
            None => Vec::new(),
        }
    }

    /// Fetch or create the session for an id. The store lock is held only
    /// for the lookup, never across a model call.
    async fn session(&self, session_id: &SessionId) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(session_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone()
    }
}
