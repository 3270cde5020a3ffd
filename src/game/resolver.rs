//! Session resolution.

use uuid::Uuid;

use crate::error::Result;
use crate::services::WordSource;
use crate::session::{Session, SessionStore};

/// Find the session for `token`, creating it if needed.
///
/// A missing token gets a fresh UUID. A new session draws its secret word
/// from `words`; if that fails nothing is stored and the error propagates.
pub async fn resolve_session(
    store: &SessionStore,
    words: &dyn WordSource,
    token: Option<&str>,
) -> Result<Session> {
    let token = match token.filter(|t| !t.is_empty()) {
        Some(t) => t.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    if let Some(session) = store.get(&token) {
        session.touch();
        tracing::debug!(session_id = %token, "Using existing session");
        return Ok(session);
    }

    let secret = words.random_word().await?;
    let session = store.insert_if_absent(&token, secret);

    tracing::info!(
        name: "session.created",
        session_id = %session.id(),
        category = %session.category(),
        "Created new session"
    );
    tracing::debug!(session_id = %session.id(), secret = %session.secret_word(), "Secret word assigned");

    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::{GameError, ServiceError};
    use crate::services::SecretWord;

    #[derive(Debug, Default)]
    struct CountingWords {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WordSource for CountingWords {
        async fn random_word(&self) -> std::result::Result<SecretWord, ServiceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SecretWord {
                word: format!("mot{n}"),
                category: "divers".to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct DownWords;

    #[async_trait]
    impl WordSource for DownWords {
        async fn random_word(&self) -> std::result::Result<SecretWord, ServiceError> {
            Err(ServiceError::Timeout {
                service: "word source",
            })
        }
    }

    #[tokio::test]
    async fn test_missing_token_creates_fresh_session() {
        let store = SessionStore::new();
        let words = CountingWords::default();

        let a = resolve_session(&store, &words, None).await.unwrap();
        let b = resolve_session(&store, &words, Some("")).await.unwrap();

        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_known_token_reuses_session() {
        let store = SessionStore::new();
        let words = CountingWords::default();

        let first = resolve_session(&store, &words, Some("tok")).await.unwrap();
        let again = resolve_session(&store, &words, Some("tok")).await.unwrap();

        assert_eq!(first.id(), "tok");
        assert_eq!(again.secret_word(), first.secret_word());
        assert_eq!(words.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_word_source_failure_stores_nothing() {
        let store = SessionStore::new();

        let err = resolve_session(&store, &DownWords, Some("tok"))
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::Service(ServiceError::Timeout { .. })));
        assert!(store.is_empty());
    }
}
