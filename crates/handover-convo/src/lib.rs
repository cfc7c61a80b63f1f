#![doc = include_str!("../README.md")]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "poller")]
mod poller;

#[cfg(feature = "http")]
pub use http::{DEFAULT_INDEX, HttpStatsSource};
#[cfg(feature = "poller")]
pub use poller::{PollerConfig, PollerHandle, StatsPoller};

// ── Error ────────────────────────────────────────────────────────────

/// Errors from session and backend operations.
#[derive(Debug, thiserror::Error)]
pub enum ConvoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ConvoError>;

// ── Core types ───────────────────────────────────────────────────────

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown role `{}`", other)),
        }
    }
}

/// One message in a chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Whether a session has any messages yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Active,
}

/// An append-only chat log with its own identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// UUID v4.
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    /// Strictly increases with every appended message.
    pub updated_at: DateTime<Utc>,
}

/// Placeholder preview for a session with no messages.
pub const EMPTY_PREVIEW: &str = "No messages yet";

impl ChatSession {
    fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.messages.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Active
        }
    }

    /// Most recent message text, truncated to `max_len` characters, or
    /// [`EMPTY_PREVIEW`].
    pub fn preview(&self, max_len: usize) -> String {
        let Some(last) = self.messages.last() else {
            return EMPTY_PREVIEW.to_string();
        };
        if last.text.is_empty() {
            return EMPTY_PREVIEW.to_string();
        }
        if last.text.chars().count() > max_len {
            let truncated: String = last.text.chars().take(max_len).collect();
            format!("{}...", truncated)
        } else {
            last.text.clone()
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        let now = Utc::now();
        // Clock resolution can repeat a timestamp; updated_at must still move.
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::microseconds(1)
        };
    }
}

/// Read-only view of a session for list rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

// ── Session store ────────────────────────────────────────────────────

/// Ordered collection of chat sessions with one optional active session.
///
/// Sessions are only ever created and appended to. Removing sessions is
/// left to whatever owns the store.
///
/// ```
/// use handover_convo::{ChatMessage, SessionStore};
///
/// let mut store = SessionStore::new();
/// let id = store.create_session(Some("Billing handover"));
/// store.append_message(&id, ChatMessage::user("Who owns invoicing?")).unwrap();
///
/// assert_eq!(store.active_session().unwrap().message_count(), 1);
/// assert!(store.append_message("missing", ChatMessage::user("hi")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_session_id: Option<String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty session, make it active, and return its id.
    ///
    /// A missing or blank title becomes `"New chat N"`.
    pub fn create_session(&mut self, title: Option<&str>) -> String {
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("New chat {}", self.sessions.len() + 1),
        };
        let session = ChatSession::new(title);
        let id = session.id.clone();
        tracing::debug!(session = %id, title = %session.title, "created session");
        self.sessions.push(session);
        self.active_session_id = Some(id.clone());
        id
    }

    /// Make `id` the active session. Unknown ids are ignored; returns whether
    /// the selection changed to `id`.
    pub fn select_session(&mut self, id: &str) -> bool {
        if self.session(id).is_some() {
            self.active_session_id = Some(id.to_string());
            true
        } else {
            tracing::debug!(session = %id, "ignored selection of unknown session");
            false
        }
    }

    pub fn append_message(&mut self, id: &str, message: ChatMessage) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ConvoError::NotFound(id.to_string()))?;
        session.push(message);
        Ok(())
    }

    /// Append `text` as a user message, ask `transport` for a reply, and
    /// append the reply.
    ///
    /// If the transport fails, the user message stays in the log and the
    /// error is returned.
    pub fn send<T: ChatTransport + ?Sized>(
        &mut self,
        transport: &T,
        id: &str,
        text: &str,
    ) -> Result<ChatMessage> {
        let history = self
            .session(id)
            .ok_or_else(|| ConvoError::NotFound(id.to_string()))?
            .messages
            .clone();
        self.append_message(id, ChatMessage::user(text))?;
        let reply = transport.reply(&history, text).inspect_err(|e| {
            tracing::warn!(session = %id, error = %e, "chat transport failed");
        })?;
        self.append_message(id, reply.clone())?;
        Ok(reply)
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_session_id().and_then(|id| self.session(id))
    }

    /// Summaries in store order, previews truncated to `preview_len` chars.
    pub fn summaries(&self, preview_len: usize) -> Vec<SessionSummary> {
        self.sessions
            .iter()
            .map(|s| SessionSummary {
                id: s.id.clone(),
                title: s.title.clone(),
                preview: s.preview(preview_len),
                message_count: s.message_count(),
                updated_at: s.updated_at,
                active: self.active_session_id.as_deref() == Some(s.id.as_str()),
            })
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a store from `path`, or an empty store if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

// ── Backend status ───────────────────────────────────────────────────

/// Backend statistics shown next to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_documents: u64,
    pub recent_uploads: u64,
    pub status: String,
}

impl Stats {
    pub const CONNECTING: &'static str = "connecting";
    pub const DEGRADED: &'static str = "degraded";

    /// Value shown before the first poll completes.
    pub fn connecting() -> Self {
        Self {
            total_documents: 0,
            recent_uploads: 0,
            status: Self::CONNECTING.to_string(),
        }
    }

    /// Same counts, status replaced with the degraded indicator.
    pub fn degraded(&self) -> Self {
        Self {
            status: Self::DEGRADED.to_string(),
            ..self.clone()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.status == Self::DEGRADED
    }
}

// ── Traits ───────────────────────────────────────────────────────────

/// The backend that answers chat messages.
pub trait ChatTransport {
    /// Reply to `message`, given the session's `history` before it.
    fn reply(&self, history: &[ChatMessage], message: &str) -> Result<ChatMessage>;
}

/// Where [`Stats`] come from.
pub trait StatsSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Stats>> + Send;
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Echo {
        seen: RefCell<Vec<usize>>,
    }

    impl ChatTransport for Echo {
        fn reply(&self, history: &[ChatMessage], message: &str) -> Result<ChatMessage> {
            self.seen.borrow_mut().push(history.len());
            Ok(ChatMessage::assistant(format!("echo: {}", message)))
        }
    }

    struct Down;

    impl ChatTransport for Down {
        fn reply(&self, _: &[ChatMessage], _: &str) -> Result<ChatMessage> {
            Err(ConvoError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn test_create_sets_active() {
        let mut store = SessionStore::new();
        let a = store.create_session(Some("Test"));
        assert_eq!(store.active_session_id(), Some(a.as_str()));
        let b = store.create_session(None);
        assert_eq!(store.active_session_id(), Some(b.as_str()));
        assert_eq!(store.sessions().len(), 2);
        assert_eq!(store.sessions()[0].title, "Test");
        assert_eq!(store.sessions()[1].title, "New chat 2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_blank_title_gets_default() {
        let mut store = SessionStore::new();
        let id = store.create_session(Some("   "));
        assert_eq!(store.session(&id).unwrap().title, "New chat 1");
    }

    #[test]
    fn test_append_two_messages() {
        let mut store = SessionStore::new();
        let id = store.create_session(Some("Test"));
        let created = store.session(&id).unwrap().updated_at;

        store.append_message(&id, ChatMessage::user("first")).unwrap();
        let t1 = store.session(&id).unwrap().updated_at;
        store.append_message(&id, ChatMessage::assistant("second")).unwrap();
        let t2 = store.session(&id).unwrap().updated_at;

        let session = store.session(&id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert!(created < t1);
        assert!(t1 < t2);
        assert_eq!(session.created_at, created);
    }

    #[test]
    fn test_append_unknown_session() {
        let mut store = SessionStore::new();
        let err = store
            .append_message("nonexistent", ChatMessage::user("hi"))
            .unwrap_err();
        assert!(matches!(err, ConvoError::NotFound(id) if id == "nonexistent"));
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let mut store = SessionStore::new();
        let a = store.create_session(Some("A"));
        let b = store.create_session(Some("B"));
        assert!(!store.select_session("nonexistent"));
        assert_eq!(store.active_session_id(), Some(b.as_str()));
        assert!(store.select_session(&a));
        assert_eq!(store.active_session().unwrap().title, "A");
    }

    #[test]
    fn test_state_and_preview() {
        let mut store = SessionStore::new();
        let id = store.create_session(None);
        let session = store.session(&id).unwrap();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.preview(20), EMPTY_PREVIEW);

        store
            .append_message(&id, ChatMessage::assistant("The billing cutover is on Friday"))
            .unwrap();
        let session = store.session(&id).unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.preview(100), "The billing cutover is on Friday");
        assert_eq!(session.preview(11), "The billing...");
    }

    #[test]
    fn test_summaries_mark_active() {
        let mut store = SessionStore::new();
        let a = store.create_session(Some("A"));
        store.append_message(&a, ChatMessage::user("hello")).unwrap();
        store.create_session(Some("B"));

        let summaries = store.summaries(50);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].message_count, 1);
        assert_eq!(summaries[0].preview, "hello");
        assert!(!summaries[0].active);
        assert!(summaries[1].active);
    }

    #[test]
    fn test_send_appends_both_sides() {
        let mut store = SessionStore::new();
        let id = store.create_session(None);
        let echo = Echo {
            seen: RefCell::new(Vec::new()),
        };

        store.send(&echo, &id, "one").unwrap();
        let reply = store.send(&echo, &id, "two").unwrap();

        assert_eq!(reply.text, "echo: two");
        assert_eq!(*echo.seen.borrow(), vec![0, 2]);
        let messages = &store.session(&id).unwrap().messages;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2], ChatMessage::user("two"));
    }

    #[test]
    fn test_send_transport_failure_keeps_user_message() {
        let mut store = SessionStore::new();
        let id = store.create_session(None);
        assert!(store.send(&Down, &id, "hello").is_err());
        assert_eq!(store.session(&id).unwrap().messages, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn test_store_json_roundtrip() {
        let mut store = SessionStore::new();
        let id = store.create_session(Some("Test"));
        store.append_message(&id, ChatMessage::user("hi")).unwrap();

        let json = store.to_json_pretty().unwrap();
        assert!(json.contains("\"activeSessionId\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"role\": \"user\""));
        assert_eq!(SessionStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        assert_eq!(SessionStore::load(&path).unwrap(), SessionStore::new());

        let mut store = SessionStore::new();
        store.create_session(Some("Saved"));
        store.save(&path).unwrap();
        assert_eq!(SessionStore::load(&path).unwrap(), store);
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_stats_degraded_keeps_counts() {
        let stats = Stats {
            total_documents: 12,
            recent_uploads: 3,
            status: "ok".into(),
        };
        let degraded = stats.degraded();
        assert!(degraded.is_degraded());
        assert_eq!(degraded.total_documents, 12);
        assert_eq!(degraded.recent_uploads, 3);
        assert_eq!(Stats::connecting().status, Stats::CONNECTING);
    }

    #[test]
    fn test_stats_wire_shape() {
        let stats: Stats = serde_json::from_str(
            r#"{"total_documents": 5, "recent_uploads": 1, "status": "online"}"#,
        )
        .unwrap();
        assert_eq!(stats.total_documents, 5);
        assert_eq!(stats.status, "online");
    }
}
