//! Per-client result state. A session is always in exactly one of four states;
//! a generation token makes sure a late result never overwrites a newer submission.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::feedback::service::FeedbackOutcome;

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading {
        generation: u64,
    },
    Error {
        generation: u64,
        message: String,
    },
    Ready {
        generation: u64,
        outcome: FeedbackOutcome,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    #[serde(flatten)]
    pub state: SessionState,
    pub updated_at: DateTime<Utc>,
}

/// Sessions kept at most; beyond this the least recently updated one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct FeedbackSession {
    generation: u64,
    state: SessionState,
    updated_at: DateTime<Utc>,
}

impl FeedbackSession {
    fn new() -> Self {
        Self {
            generation: 0,
            state: SessionState::Idle,
            updated_at: Utc::now(),
        }
    }

    fn begin(&mut self, generation: u64) {
        self.generation = generation;
        self.set(SessionState::Loading { generation });
    }

    fn complete(&mut self, generation: u64, result: Result<FeedbackOutcome, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.set(match result {
            Ok(outcome) => SessionState::Ready {
                generation,
                outcome,
            },
            Err(message) => SessionState::Error {
                generation,
                message,
            },
        });
        true
    }

    fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    fn set(&mut self, state: SessionState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}

/// All sessions, keyed by client-chosen id. The lock is never held across a model call.
///
/// Generations come from one registry-wide counter, so a generation is never
/// reused even after a session is removed and its id submitted again.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, FeedbackSession>>,
    next_generation: AtomicU64,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Starts a submission: new generation, state = loading.
    pub async fn begin(&self, session_id: &str) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            evict_one(&mut sessions);
        }
        sessions
            .entry(session_id.to_string())
            .or_insert_with(FeedbackSession::new)
            .begin(generation);
        generation
    }

    /// Applies a result if `generation` is still current. Returns `false` for a stale result.
    pub async fn complete(
        &self,
        session_id: &str,
        generation: u64,
        result: Result<FeedbackOutcome, String>,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        let applied = sessions
            .get_mut(session_id)
            .map(|s| s.complete(generation, result))
            .unwrap_or(false);
        if !applied {
            debug!(session_id, generation, "Discarding stale feedback result");
        }
        applied
    }

    /// Forgets the session. Any result still in flight for it is dropped on arrival.
    pub async fn reset(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }

    /// Unknown sessions read as idle.
    pub async fn view(&self, session_id: &str) -> SessionView {
        let sessions = self.sessions.lock().await;
        match sessions.get(session_id) {
            Some(s) => SessionView {
                session_id: session_id.to_string(),
                state: s.state.clone(),
                updated_at: s.updated_at,
            },
            None => SessionView {
                session_id: session_id.to_string(),
                state: SessionState::Idle,
                updated_at: Utc::now(),
            },
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Drops the least recently updated session, preferring ones not awaiting a result.
fn evict_one(sessions: &mut HashMap<String, FeedbackSession>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, s)| (s.is_loading(), s.updated_at))
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        debug!(session_id = %id, "Evicting session");
        sessions.remove(&id);
    }
}
