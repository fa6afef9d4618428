//! Chat session history store.
//!
//! Explicit store keyed by session ID with a bounded turn count, injected
//! into the API context as a dependency. Single-process scale: a plain
//! mutex over a map is sufficient here.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde::Serialize;

/// Turns kept per session; the oldest are dropped beyond this bound.
pub const MAX_TURNS_PER_SESSION: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "Student"),
            Self::Assistant => write!(f, "Assistant"),
        }
    }
}

/// A single turn in a session's history.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

/// In-memory session store with bounded per-session history.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, VecDeque<Turn>>>,
    max_turns: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_max_turns(MAX_TURNS_PER_SESSION)
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_turns: max_turns.max(1),
        }
    }

    /// Append a turn, evicting the oldest once the bound is reached.
    pub fn append(&self, session_id: &str, role: Role, content: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            let history = sessions.entry(session_id.to_string()).or_default();
            while history.len() >= self.max_turns {
                history.pop_front();
            }
            history.push_back(Turn {
                role,
                content: content.to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
            });
        }
    }

    /// Ordered history for a session; empty for unknown IDs.
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .lock()
            .map(|sessions| {
                sessions
                    .get(session_id)
                    .map(|h| h.iter().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_has_empty_history() {
        let store = SessionStore::new();
        assert!(store.history("nope").is_empty());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn append_preserves_order() {
        let store = SessionStore::new();
        store.append("s1", Role::Student, "What is osmosis?");
        store.append("s1", Role::Assistant, "Movement of water across a membrane.");

        let history = store.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::Student);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[0].content, "What is osmosis?");
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new();
        store.append("a", Role::Student, "hello");
        store.append("b", Role::Student, "world");

        assert_eq!(store.history("a").len(), 1);
        assert_eq!(store.history("b").len(), 1);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn history_bounded_drops_oldest() {
        let store = SessionStore::with_max_turns(3);
        for i in 0..5 {
            store.append("s", Role::Student, &format!("turn {i}"));
        }

        let history = store.history("s");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "turn 2");
        assert_eq!(history[2].content, "turn 4");
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
