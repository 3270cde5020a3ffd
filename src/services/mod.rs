//! Outbound collaborators.
//!
//! The game needs two things from the network: a random secret word and a
//! similarity score between two words. Both sit behind traits so the
//! handler can be driven by in-process fakes in tests.
//!
//! - [`WordSource`]: picks a secret word and its category
//! - [`SimilarityScorer`]: scores a guess against the secret word

pub mod similarity;
pub mod word_source;

use async_trait::async_trait;

use crate::error::ServiceError;

pub use similarity::HttpSimilarityScorer;
pub use word_source::HttpWordSource;

/// A secret word together with its category hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretWord {
    pub word: String,
    pub category: String,
}

/// Source of random secret words.
#[async_trait]
pub trait WordSource: Send + Sync + std::fmt::Debug {
    async fn random_word(&self) -> Result<SecretWord, ServiceError>;
}

/// Semantic similarity between two words, in `[-1, 1]`.
#[async_trait]
pub trait SimilarityScorer: Send + Sync + std::fmt::Debug {
    async fn similarity(&self, guess: &str, secret: &str) -> Result<f64, ServiceError>;
}
