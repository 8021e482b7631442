use std::collections::HashMap;
use std::sync::Arc;

use np_app::Session;
use np_core::NewsBackend;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the cookie that ties a browser to its session.
pub const SESSION_COOKIE: &str = "np_session";

/// Sessions kept in memory before old ones are dropped to make room.
const MAX_SESSIONS: usize = 1024;

/// Shared web state: one [`Session`] per browser, all talking to the same
/// backend.
pub struct AppState {
    backend: Arc<dyn NewsBackend>,
    sessions: RwLock<HashMap<String, Session>>,
    /// Where the "Connect with LinkedIn" link points.
    pub connect_url: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn NewsBackend>) -> np_core::Result<Self> {
        let connect_url = backend.auth_url()?.to_string();
        Ok(Self { backend, sessions: RwLock::new(HashMap::new()), connect_url })
    }

    pub async fn session(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Creates a fresh session under a new random id.
    pub async fn open_session(&self) -> (String, Session) {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(self.backend.clone());
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= MAX_SESSIONS {
            if let Some(evicted) = sessions.keys().next().cloned() {
                tracing::debug!("Session store full, dropping {}", evicted);
                sessions.remove(&evicted);
            }
        }
        sessions.insert(id.clone(), session.clone());
        (id, session)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
