//! Game session state and session storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::SecretWord;

/// A scored guess. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessRecord {
    pub guess: String,
    pub score: f64,
}

impl GuessRecord {
    pub fn new(guess: impl Into<String>, score: f64) -> Self {
        Self {
            guess: guess.into(),
            score,
        }
    }
}

/// A single player's game.
///
/// Cloning is cheap; clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Cookie token identifying the session.
    id: String,
    /// Word to find. Fixed for the lifetime of the session.
    secret: SecretWord,
    /// Guesses, best score first.
    history: RwLock<Vec<GuessRecord>>,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl Session {
    fn new(id: String, secret: SecretWord) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(SessionInner {
                id,
                secret,
                history: RwLock::new(Vec::new()),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The word this session is trying to find.
    #[must_use]
    pub fn secret_word(&self) -> &str {
        &self.inner.secret.word
    }

    /// Category hint for the secret word.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.inner.secret.category
    }

    /// When the session was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Append a guess and re-sort the history by score, highest first.
    ///
    /// The sort is stable: guesses with equal scores keep their insertion
    /// order.
    pub fn record_guess(&self, record: GuessRecord) {
        let mut guard = self
            .inner
            .history
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.push(record);
        guard.sort_by(|a, b| b.score.total_cmp(&a.score));
        drop(guard);
        self.touch();
    }

    /// Snapshot of the guess history, best first.
    #[must_use]
    pub fn history(&self) -> Vec<GuessRecord> {
        self.inner
            .history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of guesses made so far.
    #[must_use]
    pub fn guess_count(&self) -> usize {
        self.inner
            .history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Update the last activity timestamp.
    pub fn touch(&self) {
        let mut guard = self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Utc::now();
    }

    /// Check if the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match (Utc::now() - last).to_std() {
            Ok(idle) => idle > timeout,
            // Clock skew puts `last` in the future.
            Err(_) => false,
        }
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        let guard = self
            .inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        guard.get(id).cloned()
    }

    /// Insert a new session unless one already exists under `id`.
    ///
    /// Returns whichever session ends up stored, so two racing first
    /// requests for the same token agree on one secret word.
    pub fn insert_if_absent(&self, id: &str, secret: SecretWord) -> Session {
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id.to_string(), secret))
            .clone()
    }

    /// Get the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all session IDs.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Remove sessions that have been inactive longer than the timeout.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self, timeout: Duration) -> usize {
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired_with_timeout(timeout));
        before - guard.len()
    }
}
