//! Random word provider client.
//!
//! The provider answers `GET` with a single-element JSON array:
//! `[{"name": "chien", "categorie": "animaux"}]`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{SecretWord, WordSource};
use crate::error::ServiceError;

const SERVICE: &str = "word source";

/// Entry as returned by the provider.
#[derive(Debug, Deserialize)]
struct WordDto {
    name: String,
    #[serde(default)]
    categorie: String,
}

/// HTTP client for the random word provider.
#[derive(Debug, Clone)]
pub struct HttpWordSource {
    client: Client,
    url: String,
}

impl HttpWordSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WordSource for HttpWordSource {
    async fn random_word(&self) -> Result<SecretWord, ServiceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = %status, "Word source returned error status");
            return Err(ServiceError::Status {
                service: SERVICE,
                status,
            });
        }

        let words: Vec<WordDto> = response
            .json()
            .await
            .map_err(|e| ServiceError::from_reqwest(SERVICE, e))?;

        let first = words
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Malformed {
                service: SERVICE,
                reason: "empty word list".to_string(),
            })?;

        let word = first.name.trim().to_string();
        if word.is_empty() {
            return Err(ServiceError::Malformed {
                service: SERVICE,
                reason: "blank word".to_string(),
            });
        }

        Ok(SecretWord {
            word,
            category: first.categorie.trim().to_string(),
        })
    }
}
