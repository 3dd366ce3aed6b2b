// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Per-session record. The history is append-only; a session is reset by
/// dropping it.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    messages: Vec<Message>,
    pub last_active: Instant,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), messages: Vec::new(), last_active: Instant::now() }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a turn and returns the new history length.
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.last_active = Instant::now();
        self.messages.len()
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, SessionHandle>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    // Create a fresh session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), Arc::new(Mutex::new(Session::new(id.clone()))));
        id
    }

    // Ensure there's a session with this id.
    pub async fn ensure_session(&self, id: &str) -> SessionHandle {
        {
            let guard = self.inner.read().await;
            if let Some(handle) = guard.get(id) {
                return handle.clone();
            }
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(id))))
            .clone()
    }

    /// Resolves the caller's session, creating one on first visit, and marks
    /// it active. Blank ids count as "no session yet".
    ///
    /// The returned handle is always the one registered under `id`: a handle
    /// purged between lookup and touch is discarded and the lookup retried.
    pub async fn checkout(&self, id: Option<&str>) -> (String, SessionHandle) {
        let id = match id.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.create_session().await,
        };
        loop {
            let handle = self.ensure_session(&id).await;
            let mut session = handle.lock().await;
            // purge_expired skips locked sessions, so membership checked
            // while holding the lock cannot change before the touch.
            let registered = self
                .inner
                .read()
                .await
                .get(&id)
                .is_some_and(|current| Arc::ptr_eq(current, &handle));
            if registered {
                session.touch();
                drop(session);
                return (id, handle);
            }
        }
    }

    // Append a message to a session's history and touch last_active.
    pub async fn append_message(&self, session_id: &str, role: MessageRole, content: impl Into<String>) -> usize {
        let handle = self.ensure_session(session_id).await;
        let mut session = handle.lock().await;
        session.push(Message { role, content: content.into() })
    }

    /// Get a copy of the session history
    pub async fn get_history(&self, session_id: &str) -> Option<Vec<Message>> {
        let handle = self.inner.read().await.get(session_id).cloned()?;
        let session = handle.lock().await;
        Some(session.messages().to_vec())
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    ///
    /// A session whose lock is held is in the middle of an interaction and is
    /// kept.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, handle| match handle.try_lock() {
            Ok(session) => now.duration_since(session.last_active) < self.ttl,
            Err(_) => true,
        });
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// List session ids
    pub async fn list_session_ids(&self) -> Vec<String> {
        let guard = self.inner.read().await;
        guard.keys().cloned().collect()
    }
}
