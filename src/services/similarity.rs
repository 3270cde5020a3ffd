//! Word-embedding similarity client.
//!
//! `POST {"word1": guess, "word2": secret}` → `{"result": 0.42}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::SimilarityScorer;
use crate::error::ServiceError;

const SERVICE: &str = "similarity service";

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    word1: &'a str,
    word2: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimilarityResponse {
    result: f64,
}

/// HTTP client for the similarity service.
#[derive(Debug, Clone)]
pub struct HttpSimilarityScorer {
    client: Client,
    url: String,
}

impl HttpSimilarityScorer {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SimilarityScorer for HttpSimilarityScorer {
    async fn similarity(&self, guess: &str, secret: &str) -> Result<f64, ServiceError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SimilarityRequest {
                word1: guess,
                word2: secret,
            })
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                url = %self.url,
                status = %status,
                body = %body,
                "Similarity service returned error status"
            );
            return Err(ServiceError::Status {
                service: SERVICE,
                status,
            });
        }

        let payload: SimilarityResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        if !payload.result.is_finite() {
            return Err(ServiceError::Malformed {
                service: SERVICE,
                reason: format!("score is not a finite number: {}", payload.result),
            });
        }

        // Embedding cosines can drift a hair outside the unit interval.
        Ok(payload.result.clamp(-1.0, 1.0))
    }
}
