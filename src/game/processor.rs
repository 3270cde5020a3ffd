//! Guess validation and scoring.

use crate::error::{GameError, Result};
use crate::services::SimilarityScorer;
use crate::session::{GuessRecord, Session};

/// Message shown when the guess is missing or blank.
pub const EMPTY_GUESS_MESSAGE: &str = "Please enter a valid word";

/// Trim the raw guess; blank or missing input is rejected.
pub fn parse_guess(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim) {
        Some(guess) if !guess.is_empty() => Ok(guess.to_string()),
        _ => Err(GameError::InvalidInput(EMPTY_GUESS_MESSAGE.to_string())),
    }
}

/// Score `raw` against the session's secret word and record it.
///
/// On any failure the session history is left untouched.
pub async fn process_guess(
    session: &Session,
    scorer: &dyn SimilarityScorer,
    raw: Option<&str>,
) -> Result<GuessRecord> {
    let guess = parse_guess(raw)?;
    let score = scorer.similarity(&guess, session.secret_word()).await?;

    tracing::info!(
        name: "guess.scored",
        session_id = %session.id(),
        guess = %guess,
        score = score,
        "Guess scored"
    );

    let record = GuessRecord::new(guess, score);
    session.record_guess(record.clone());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::error::ServiceError;
    use crate::services::SecretWord;
    use crate::session::SessionStore;

    #[derive(Debug)]
    struct TableScorer(HashMap<&'static str, f64>);

    #[async_trait]
    impl SimilarityScorer for TableScorer {
        async fn similarity(
            &self,
            guess: &str,
            _secret: &str,
        ) -> std::result::Result<f64, ServiceError> {
            self.0
                .get(guess)
                .copied()
                .ok_or(ServiceError::Status {
                    service: "similarity service",
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                })
        }
    }

    fn session() -> Session {
        SessionStore::new().insert_if_absent(
            "tok",
            SecretWord {
                word: "chien".to_string(),
                category: "animaux".to_string(),
            },
        )
    }

    fn scorer() -> TableScorer {
        TableScorer(HashMap::from([
            ("chien", 1.0),
            ("chat", 0.76),
            ("voiture", 0.12),
        ]))
    }

    #[test]
    fn test_parse_guess() {
        assert_eq!(parse_guess(Some("  chat ")).unwrap(), "chat");
        assert!(matches!(parse_guess(None), Err(GameError::InvalidInput(_))));
        assert!(matches!(
            parse_guess(Some("   ")),
            Err(GameError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_guesses_sorted_and_secret_untouched() {
        let session = session();
        let scorer = scorer();

        for guess in ["voiture", "chat", "chien"] {
            process_guess(&session, &scorer, Some(guess)).await.unwrap();
            assert_eq!(session.secret_word(), "chien");
        }

        let history = session.history();
        assert_eq!(history[0], GuessRecord::new("chien", 1.0));
        assert!(history.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_blank_guess_does_not_call_scorer() {
        let session = session();
        let scorer = TableScorer(HashMap::new());

        let err = process_guess(&session, &scorer, Some(" ")).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
        assert_eq!(session.guess_count(), 0);
    }

    #[tokio::test]
    async fn test_service_failure_leaves_history() {
        let session = session();
        let scorer = scorer();
        process_guess(&session, &scorer, Some("chat")).await.unwrap();

        let err = process_guess(&session, &scorer, Some("inconnu"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(session.history(), vec![GuessRecord::new("chat", 0.76)]);
    }
}
